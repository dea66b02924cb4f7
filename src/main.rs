use anyhow::Result;

fn main() -> Result<()> {
    shadcn_deno_sync::run_cli()
}
