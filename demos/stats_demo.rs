use clap::Parser;
use chain_hash::HashMap;

#[derive(Parser, Debug)]
struct Args {
    /// Number of keys to insert.
    #[arg(short = 'n', long = "count", default_value_t = 1000)]
    count: usize,
    /// Number of keys to erase again after filling the map.
    #[arg(short = 'e', long = "erase", default_value_t = 0)]
    erase: usize,
}

fn main() {
    let args = Args::parse();

    println!("Filling HashMap with {} u64 keys...", args.count);

    let mut map: HashMap<u64, u64> = HashMap::new();
    let mut resizes = 0;
    for i in 0..args.count as u64 {
        let capacity = map.capacity();
        if !map.insert(i, i * 2) {
            panic!("Key already exists in map: {}", i);
        }
        if map.capacity() != capacity {
            resizes += 1;
        }
    }

    println!("Inserted {} keys, {} resizes", map.len(), resizes);
    println!(
        "Load factor after filling: {:.2}%",
        map.load_factor() * 100.0
    );

    if args.erase > 0 {
        let capacity = map.capacity();
        let erased = (0..args.erase as u64).filter(|key| map.erase(key)).count();
        println!(
            "Erased {} keys, capacity {} -> {}",
            erased,
            capacity,
            map.capacity()
        );
    }

    map.print_chain_histogram();
    map.debug_stats().print();
}
