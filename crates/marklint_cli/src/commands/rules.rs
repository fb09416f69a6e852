//! Rules command implementation

use marklint_core::RuleRegistry;
use marklint_rules::builtin_registry;
use miette::Result;

pub fn run_rules() -> Result<()> {
    print!("{}", format_rules(&builtin_registry()));
    Ok(())
}

fn format_rules(registry: &RuleRegistry) -> String {
    let mut out = String::new();
    for rule in registry.iter() {
        let fixable = if rule.can_fix() { "fixable" } else { "" };
        out.push_str(&format!(
            "{:<6} {:<26} {:<8} {}\n",
            rule.id(),
            rule.name(),
            fixable,
            rule.description()
        ));
    }
    out
}
