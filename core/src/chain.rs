/// A single chain in the table: the start and end of an `L`-step
/// reduce/hash walk. Only the endpoints are stored; the path between them is
/// reconstructed on demand during a lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chain {
    pub start: Vec<u8>,
    pub end: Vec<u8>,
}

impl Chain {
    pub(crate) fn new(start: Vec<u8>, end: Vec<u8>) -> Self {
        Self { start, end }
    }
}
