use anyhow::Result;

pub fn version_command() -> Result<()> {
    println!("classtrace v{}", classtrace_core::version());
    Ok(())
}
