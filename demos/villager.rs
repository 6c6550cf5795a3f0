use std::error::Error;
use std::sync::Arc;

use goap_needs::{AgentBlueprint, LinearNavigator, Location, PlanVisualizer, Vec3, WorldState};
use tracing_subscriber::EnvFilter;

const VILLAGER: &str = r#"{
    "name": "villager",
    "needs": { "hunger": 0.45, "energy": 0.3 },
    "need_rates": { "hunger": 0.02, "energy": 0.015 },
    "planner": { "max_iterations": 50, "max_depth": 6 },
    "actions": [
        { "kind": "move_to", "action_type": "go_to_food", "poi_kind": "food",
          "location_fact": "at_food", "stopping_distance": 0.5 },
        { "kind": "need_reduction", "action_type": "eat", "need": "hunger",
          "location_fact": "at_food", "duration": 2.0 },
        { "kind": "move_to", "action_type": "go_to_bed", "poi_kind": "bed",
          "location_fact": "at_bed", "stopping_distance": 0.5 },
        { "kind": "need_reduction", "action_type": "sleep", "cost": 2.0, "need": "energy",
          "location_fact": "at_bed", "duration": 5.0 },
        { "kind": "timed", "action_type": "wander", "duration": 3.0,
          "effects": { "fact_wandered": true } }
    ],
    "goals": [
        { "kind": "need_reduction", "goal_type": "eat", "need": "hunger",
          "activation_threshold": 0.5, "priority_scale": 10.0 },
        { "kind": "need_reduction", "goal_type": "rest", "need": "energy",
          "activation_threshold": 0.6, "priority_scale": 8.0 },
        { "kind": "fact", "goal_type": "idle", "priority": 0.1,
          "facts": { "wandered": true } }
    ]
}"#;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let bakery = Arc::new(Location::new("bakery", Vec3::new(6.0, 0.0, 2.0)));
    let cottage = Arc::new(Location::new("cottage", Vec3::new(-4.0, 0.0, -3.0)));
    let mut world = WorldState::new();
    world.register_poi("food", &bakery);
    world.register_poi("bed", &cottage);

    let navigator = LinearNavigator::new(Vec3::ZERO, 1.5).shared();
    let mut agent = AgentBlueprint::from_json(VILLAGER)?.into_agent(Some(navigator.clone()))?;

    let visualizer = PlanVisualizer::new();
    let mut last_goal = String::new();
    for tick in 0..200 {
        let state = agent.tick(&mut world, 0.5);

        let goal = agent
            .current_goal()
            .map(|g| g.goal_type().to_string())
            .unwrap_or_default();
        if goal != last_goal {
            println!(
                "[{:>3}] goal '{}' ({:?}) hunger={:.2} energy={:.2} at {}",
                tick,
                goal,
                state,
                agent.state().need("hunger"),
                agent.state().need("energy"),
                navigator.borrow().position()
            );
            if let Some(plan) = agent.executor().plan() {
                println!("{}", visualizer.render_dot(plan, agent.actions())?);
            }
            last_goal = goal;
        }
    }

    println!(
        "final: hunger={:.2} energy={:.2}",
        agent.state().need("hunger"),
        agent.state().need("energy")
    );
    Ok(())
}
