fn main() {
    leduc_rl::cli::run();
}
