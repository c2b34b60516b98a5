use anyhow::Result;

fn main() -> Result<()> {
    probsim::app::run()
}
