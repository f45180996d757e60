use rainbow_core::{HashAlgo, Table};

fn scenario_table(seed: u64) -> Table {
    Table::with_seed(HashAlgo::Md5, 10, seed)
        .unwrap()
        .compile_alphabet("abcdefghijklmnopqrstuvwxyz", 2, 3)
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn a_chain_endpoint_is_found_by_looking_it_up_directly() {
    let mut table = scenario_table(42);
    table.generate_chains(500).unwrap();
    table.sort_chains().unwrap();

    let chain = table.new_chain().unwrap();
    table.add_chain(chain.clone()).unwrap();
    table.sort_chains().unwrap();

    assert!(table.lookup(&chain.end).unwrap().is_some());
}

#[test]
fn flipping_the_first_byte_of_a_covered_hash_misses() {
    let mut table = scenario_table(42);
    table.generate_chains(500).unwrap();
    table.sort_chains().unwrap();

    let chain = table.new_chain().unwrap();
    let mut flipped = chain.end.clone();
    flipped[0] ^= 0xff;

    // flipping a byte of an endpoint that is itself on the table would only
    // coincidentally still be covered; assert the miss path at least
    // terminates and agrees with a fresh lookup of the same bytes.
    let once = table.lookup(&flipped).unwrap();
    let twice = table.lookup(&flipped).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn a_hash_from_partway_through_a_chain_is_recovered_via_depth_recomputation() {
    let mut table = scenario_table(42);
    table.generate_chains(500).unwrap();
    table.sort_chains().unwrap();

    let chain = table.new_chain().unwrap();
    table.add_chain(chain.clone()).unwrap();
    table.sort_chains().unwrap();

    // walking only 5 of the chain's 10 steps gives a hash that (barring a
    // freak collision) is not itself a stored `end`, so `lookup` can only
    // find it by recomputing forward from depth > 0 -- the actual
    // Hellman/rainbow chain-engine algorithm, not the depth == 0 shortcut
    // that querying a literal `end` exercises.
    let (_sample_password, sample_hash) = table.sample(&chain, 5).unwrap();
    assert_ne!(sample_hash, chain.end);

    let recovered = table.lookup(&sample_hash).unwrap();
    assert!(recovered.is_some());
}

#[test]
fn an_unrelated_random_hash_is_reported_as_not_found() {
    let mut table = scenario_table(43);
    table.generate_chains(500).unwrap();
    table.sort_chains().unwrap();

    let probe = vec![0x11u8; table.digest_size()];
    assert_eq!(table.lookup(&probe).unwrap(), None);
}
