fn main() {
    let code = rqgen_cli::run_cli(std::env::args().collect());
    std::process::exit(code);
}
