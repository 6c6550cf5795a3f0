use std::io::Write;

use crate::{ActionLibrary, Plan, Result};

/// Renders plans as Graphviz DOT.
///
/// Every action in the library becomes a node. Steps already executed are
/// grey, the remaining ones red, and the steps are chained in plan order
/// into the goal node.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanVisualizer;

impl PlanVisualizer {
    pub fn new() -> Self {
        Self
    }

    /// Writes the DOT graph of `plan` to `writer`.
    pub fn write_dot<W: Write>(
        &self,
        plan: &Plan,
        actions: &ActionLibrary,
        writer: &mut W,
    ) -> Result<()> {
        writeln!(writer, "digraph GOAP {{")?;
        writeln!(writer, "    rankdir=LR;")?;
        writeln!(
            writer,
            "    node [shape=box, style=filled, fillcolor=lightblue];"
        )?;
        writeln!(writer, "    edge [fontsize=10];")?;

        for (id, action) in actions.iter() {
            writeln!(
                writer,
                "    action_{} [label=\"{}\\nCost: {}\\nEff: {}\"];",
                id.0,
                escape(action.action_type()),
                action.cost(),
                escape(&action.effects().to_string())
            )?;
        }

        writeln!(
            writer,
            "    goal [label=\"Goal\\n{}\", fillcolor=lightpink];",
            escape(plan.goal_type())
        )?;

        for (step, id) in plan.actions().iter().enumerate() {
            let color = if step < plan.cursor() {
                "lightgrey"
            } else {
                "lightcoral"
            };
            writeln!(writer, "    action_{} [fillcolor={}];", id.0, color)?;
        }

        writeln!(writer, "    edge [color=red, penwidth=2.0];")?;
        let mut previous: Option<String> = None;
        for (step, id) in plan.actions().iter().enumerate() {
            let node = format!("action_{}", id.0);
            if let Some(previous) = previous {
                writeln!(writer, "    {} -> {} [label=\"{}\"];", previous, node, step)?;
            }
            previous = Some(node);
        }
        if let Some(last) = previous {
            writeln!(writer, "    {} -> goal;", last)?;
        }

        writeln!(writer, "}}")?;
        Ok(())
    }

    /// Same as [`PlanVisualizer::write_dot`], into a `String`.
    pub fn render_dot(&self, plan: &Plan, actions: &ActionLibrary) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_dot(plan, actions, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
