fn main() -> anyhow::Result<()> {
    triad_driver::main()
}
