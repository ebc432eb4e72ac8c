mod command;
mod corpus;
mod schema;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
