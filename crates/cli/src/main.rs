fn main() -> anyhow::Result<()> {
    jdt_bridge_cli::run()
}
