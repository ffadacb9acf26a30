use anyhow::Result;

fn main() -> Result<()> {
    context_split_cli::main_entry()
}
