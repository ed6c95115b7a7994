fn main() -> anyhow::Result<()> {
    orbview::run()
}
