fn main() -> anyhow::Result<()> {
    crt_menu::run()
}
