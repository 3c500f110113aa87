//! testease CLI entry point: runs the sample suite

mod demo;

fn main() {
    testease::cli::run();
}
