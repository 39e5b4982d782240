fn main() -> anyhow::Result<()> {
    skimreader_lib::run()
}
