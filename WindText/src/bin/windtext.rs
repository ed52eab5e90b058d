fn main() -> anyhow::Result<()> {
    windtext::cli::run_cli()
}
