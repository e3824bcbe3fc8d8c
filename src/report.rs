use crate::analyzer::AnalysisResult;

pub const CONSISTENT_MESSAGE: &str = "Contract ordering is consistent.";

/// Human readable description of every conflict and cycle in `result`.
/// Empty when the result is consistent.
pub fn render(result: &AnalysisResult) -> String {
    let mut lines = Vec::new();

    for conflict in &result.conflicts {
        let name_a = result.name_of(conflict.a);
        let name_b = result.name_of(conflict.b);
        lines.push(format!(
            "Conflict between {} and {} detected in the following dependency chains:",
            name_a, name_b
        ));
        for entry in &conflict.chains {
            lines.push(format!(
                "- {} {} {} in {}",
                name_a,
                entry.direction.symbol(),
                name_b,
                result.name_of(entry.through_contract)
            ));
        }
    }

    for cycle in result.cycles() {
        let members: Vec<String> = cycle.members.iter().map(|&id| result.name_of(id)).collect();
        let through: Vec<String> = cycle.through.iter().map(|&id| result.name_of(id)).collect();
        lines.push(format!(
            "Cycle between {} detected through: {}",
            members.join(", "),
            through.join(", ")
        ));
    }

    lines.join("\n")
}
