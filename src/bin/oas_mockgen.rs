fn main() -> anyhow::Result<()> {
    oas_mockgen::cli::run_cli()
}
