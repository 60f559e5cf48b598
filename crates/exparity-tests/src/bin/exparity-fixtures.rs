//! Standalone build of the fixture corpus runner, accepting libtest flags

fn main() {
    exparity_tests::fixture::main()
}
