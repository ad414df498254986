use blocking_pitfalls::{shared_context, timeout};

/// Which demo to run. Fixed on purpose; there is no flag parsing here.
const DEMO: usize = 1;

const DEMOS: [(&str, fn() -> anyhow::Result<()>); 2] = [
    ("shared context", shared_context::run),
    ("timeout", timeout::run),
];

fn main() -> anyhow::Result<()> {
    let (name, demo) = DEMOS[DEMO];
    println!("=== {} demo ===", name);
    println!();
    demo()?;
    println!();
    println!("Done");
    Ok(())
}
