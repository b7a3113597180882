use super::*;
use crate::actor::{Body, Entity};
use crate::brain;

fn sparse_config(target_population: usize) -> SimConfig {
    SimConfig {
        world_width: 4000.0,
        world_height: 4000.0,
        target_population,
        ..SimConfig::default()
    }
}

fn seeded_world(config: SimConfig) -> World {
    let mut world = World::new(config);
    world.on_tick();
    world
}

fn kill(world: &mut World, indices: impl IntoIterator<Item = usize>) {
    for i in indices {
        world.agents[i].body_mut().health = 0.0;
    }
}

/// Agent with no synapses: it never moves and never attacks.
fn idle_agent(world: &mut World, position: [f64; 2]) -> Agent {
    let id = world.next_agent_id();
    let body = Body::new(
        position,
        0.0,
        world.config.agent_radius,
        world.config.initial_health,
        &world.bounds,
    );
    Agent::with_body(id, 0, brain::skeleton(), body)
}

#[test]
fn new_world_is_empty_until_first_tick() {
    let mut world = World::with_size(1024.0, 768.0);
    assert!(world.agents().is_empty());
    assert!(world.food().is_empty());
    assert_eq!(world.gen_tick(), (0, 0));

    world.on_tick();
    assert_eq!(world.agents().len(), 20);
    assert_eq!(world.food().len(), 20);
    assert_eq!(world.gen_tick(), (1, 0));
    assert!(world.history().is_empty(), "seeding records no statistics");
    assert!(world.agents().iter().all(|a| a.generation() == 0));
}

#[test]
fn invalid_config_is_rejected() {
    let config = SimConfig {
        survivor_fraction: 0.9,
        ..SimConfig::default()
    };
    assert_eq!(
        World::try_new(config).err(),
        Some(WorldInitError::Config(SimConfigError::InvalidSurvivorFraction(0.9)))
    );
}

#[test]
fn zero_sensor_reach_is_rejected() {
    let config = SimConfig {
        sight_reach: 0.0,
        ..SimConfig::default()
    };
    assert_eq!(
        World::try_new(config).err(),
        Some(WorldInitError::Config(SimConfigError::NonPositiveParameter("sight_reach")))
    );
}

#[test]
fn reaps_one_dead_agent_per_tick() {
    let mut world = seeded_world(sparse_config(10));
    kill(&mut world, [2, 5, 7]);
    let doomed: Vec<AgentId> = [2, 5, 7].iter().map(|&i| world.agents[i].id()).collect();

    for expected in [9, 8, 7] {
        world.on_tick();
        assert_eq!(world.agents().len(), expected);
    }
    assert!(doomed.iter().all(|&id| world.find_agent(id).is_none()));
    assert_eq!(world.gen_tick(), (1, 3));
}

#[test]
fn reaped_agent_is_forgotten() {
    let mut world = World::new(sparse_config(4));
    let a = idle_agent(&mut world, [2000.0, 2000.0]);
    let b = idle_agent(&mut world, [2010.0, 2000.0]);
    let c = idle_agent(&mut world, [100.0, 100.0]);
    let (a_id, b_id) = (a.id(), b.id());
    world.agents = vec![a, b, c];

    world.on_tick();
    assert_eq!(world.agents[0].memory().get(&b_id), Some(&false));
    assert_eq!(world.agents[1].memory().get(&a_id), Some(&false));

    kill(&mut world, [1]);
    world.on_tick();
    assert!(world.find_agent(b_id).is_none());
    assert!(world.agents[0].memory().is_empty());
}

#[test]
fn continued_contact_is_logged_once_per_side() {
    let mut world = World::new(sparse_config(4));
    let a = idle_agent(&mut world, [2000.0, 2000.0]);
    let b = idle_agent(&mut world, [2010.0, 2000.0]);
    world.agents = vec![a, b];

    for _ in 0..5 {
        world.on_tick();
    }
    let tally = world.tally();
    assert_eq!(tally.cooperate_cooperate, 2, "one event per participant");
    assert_eq!(tally.total(), 2);
    let expected = world.config.initial_health - 5.0 * world.config.hunger_per_tick;
    for agent in world.agents() {
        assert!((agent.health() - expected).abs() < 1e-9);
    }
}

#[test]
fn transition_refills_population_from_survivors() {
    let mut world = seeded_world(sparse_config(8));
    kill(&mut world, 0..6);
    let survivors: Vec<AgentId> = world.agents[6..].iter().map(|a| a.id()).collect();

    for _ in 0..6 {
        world.on_tick();
    }
    assert_eq!(world.gen_tick(), (2, 0));
    assert_eq!(world.agents().len(), 8);
    assert_eq!(world.food().len(), 8);
    assert!(world.agents().iter().all(|a| a.is_alive()));

    let history = world.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].generation, 0);
    assert_eq!(history[0].lifetime_ticks, 6);

    // Survivors come back reset, each right after its mutated clone.
    for (k, id) in survivors.iter().enumerate() {
        let kept = &world.agents()[2 * k + 1];
        assert_eq!(kept.id(), *id);
        assert_eq!(kept.generation(), 0);
        assert_eq!(kept.health(), world.config.initial_health);
        assert!(kept.memory().is_empty());
        let clone = &world.agents()[2 * k];
        assert_eq!(clone.generation(), 1);
        assert_eq!(clone.brain().synapses().len(), kept.brain().synapses().len());
    }
    let new_agents = world.agents().iter().filter(|a| a.generation() == 1).count();
    assert_eq!(new_agents, 6);
}

#[test]
fn agent_ids_are_never_reused() {
    let mut world = seeded_world(sparse_config(8));
    let before: Vec<AgentId> = world.agents().iter().map(|a| a.id()).collect();
    kill(&mut world, 0..6);
    for _ in 0..6 {
        world.on_tick();
    }
    let mut ids: Vec<AgentId> = world.agents().iter().map(|a| a.id()).collect();
    ids.extend(&before[..6]);
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 14);
}

#[test]
fn extinction_reseeds_random_population() {
    let config = SimConfig {
        survivor_fraction: 0.0,
        ..sparse_config(3)
    };
    let mut world = seeded_world(config);
    kill(&mut world, 0..3);
    for _ in 0..3 {
        world.on_tick();
    }
    assert_eq!(world.gen_tick(), (2, 0));
    assert_eq!(world.agents().len(), 3);
    assert!(world.agents().iter().all(|a| a.generation() == 1));
}

#[test]
fn run_generations_stops_after_requested_generation() {
    let config = SimConfig {
        hunger_per_tick: 20.0,
        food_per_agent: 0.0,
        ..sparse_config(10)
    };
    let mut world = World::new(config);
    let ticks = world.run_generations(2, Some(100_000));
    assert!(ticks > 0);
    assert_eq!(world.gen_tick().0, 3);
    assert_eq!(world.history().len(), 2);
    assert!(world.history().iter().all(|g| g.lifetime_ticks > 0));
}

#[test]
fn run_generations_honors_tick_limit() {
    let mut world = World::new(sparse_config(10));
    assert_eq!(world.run_generations(50, Some(7)), 7);
}

#[test]
fn same_seed_gives_same_run() {
    let run = || {
        let mut world = World::new(SimConfig {
            seed: 7,
            ..SimConfig::default()
        });
        for _ in 0..300 {
            world.on_tick();
        }
        (world.gen_tick(), world.tally(), world.agent_snapshots())
    };
    assert_eq!(run(), run());
}

#[test]
fn exit_without_agents_reports_none() {
    let mut world = World::with_size(640.0, 480.0);
    let report = world.on_exit();
    assert_eq!(report.final_generation, 0);
    assert!(report.generations.is_empty());
    assert_eq!(report.sample_brain, None);
    assert_eq!(report.world_size, [640.0, 480.0]);
}

#[test]
fn exit_samples_a_living_brain() {
    let mut world = seeded_world(sparse_config(5));
    let report = world.on_exit();
    let brain = report.sample_brain.expect("living agents remain");
    assert!(brain.contains(" -> "));
    assert_eq!(brain.matches(", ").count(), 17);
}

#[test]
fn snapshots_mirror_agents() {
    let world = seeded_world(sparse_config(5));
    let snapshots = world.agent_snapshots();
    assert_eq!(snapshots.len(), 5);
    for (snap, agent) in snapshots.iter().zip(world.agents()) {
        assert_eq!(snap.id, agent.id());
        assert_eq!(snap.position, agent.position());
        assert_eq!(snap.health, agent.health());
    }
}

#[test]
fn report_does_not_disturb_the_run() {
    let run = |observe: bool| {
        let mut world = World::new(sparse_config(6));
        for _ in 0..200 {
            world.on_tick();
            if observe {
                let first = world.report();
                assert_eq!(world.report(), first);
            }
        }
        world.agent_snapshots()
    };
    assert_eq!(run(true), run(false));
}

#[test]
fn report_matches_exit_except_for_sample() {
    let mut world = seeded_world(sparse_config(5));
    let report = world.report();
    assert!(report.sample_brain.is_some());
    let exit = world.on_exit();
    assert_eq!(report.generations, exit.generations);
    assert_eq!(report.final_generation, exit.final_generation);
}
