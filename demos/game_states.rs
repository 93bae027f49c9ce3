//! Game State Machine
//!
//! This example demonstrates several states being active at once.
//!
//! Key concepts:
//! - Event conditions that stay latched until their source is re-entered
//! - Transitions of equal priority fanning out to several destinations
//! - Declaring one transition for a group of states
//!
//! Run with: cargo run --example game_states

use polystate::builder::MachineBuilder;
use polystate::core::{log, Priority};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum GameState {
    Loader,
    Intro,
    Menu,
    Configuration,
    GetReady,
    Level,
    LevelFinish,
    GameOver,
    Exit,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum GameEvent {
    Done,
    Start,
    Escape,
    FireA,
    FireB,
    Dead,
    Complete,
}

use GameEvent::*;
use GameState::*;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Game State Machine ===\n");

    let mut builder = MachineBuilder::new(Priority::Normal);
    builder
        .state(Loader)
        .start()
        .on(Done)
        .action(log("loading finished"))
        .then(Intro);
    builder.state(Intro).on(Done).then(Menu);
    builder
        .state(Menu)
        .on(Start)
        .then(GetReady)
        .on(Escape)
        .then(Exit)
        .on_any([FireA, FireB])
        .then(Configuration);
    builder.state(GetReady).on(Done).then(Level);
    builder.state(LevelFinish).on(Done).then(GetReady);
    builder
        .state(Level)
        .on(Dead)
        .then(GameOver)
        .on(Complete)
        .then(LevelFinish);
    builder.state(GameOver).on(Done).then(Menu);
    builder
        .states([Intro, Configuration, GetReady, Level, LevelFinish, GameOver])
        .on(Escape)
        .then(Menu);
    builder
        .state(Configuration)
        .on_any([FireA, FireB])
        .then(Menu)
        .on(FireA)
        .then(Intro);
    builder.state(Exit).end();

    let mut machine = builder.build();

    for event in [Done, Done, FireA, FireA, Start, Done, Start, Done, Escape, Escape] {
        let fired = machine.handle_event(&event);
        let mut active: Vec<String> = machine
            .active_states()
            .iter()
            .map(|state| format!("{state:?}"))
            .collect();
        active.sort();
        let event = format!("{event:?}");
        println!("{event:<8} fired {fired}, active: {}", active.join(", "));
    }

    println!("\nFinished: {}", machine.is_finished());
}
