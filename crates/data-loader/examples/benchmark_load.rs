use data_loader::DataIndex;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data/ml-latest-small");

    println!("Loading MovieLens dataset from {}...\n", data_dir.display());

    let start = Instant::now();
    let index = match DataIndex::load_from_dir(data_dir) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("Failed to load dataset: {e}");
            return;
        }
    };
    let elapsed = start.elapsed();

    let (users, movies, ratings) = index.counts();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Users: {}", users);
    println!("Movies: {}", movies);
    println!("Ratings: {}", ratings);
    println!("\nPerformance: {:.0} ratings/second",
             ratings as f64 / elapsed.as_secs_f64());
}
