//! Traffic Light State Machine
//!
//! This example demonstrates a cyclic machine driven by timers.
//!
//! Key concepts:
//! - Timer conditions armed whenever their source state is entered
//! - Entry actions
//! - A power switch that leaves every state through one declaration
//! - Graphviz output of the machine structure
//!
//! Run with: cargo run --example traffic_light

use polystate::builder::{after, MachineBuilder};
use polystate::core::Priority;
use polystate::dot;
use std::thread;
use std::time::Duration;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum TrafficLight {
    Red,
    Yellow,
    Green,
    Off,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum Switch {
    PowerDown,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light State Machine ===\n");

    let mut builder = MachineBuilder::new(Priority::Normal);
    builder
        .state(TrafficLight::Red)
        .start()
        .on_entry(|| println!("  Red    (Stop)"))
        .when(after(300))
        .then(TrafficLight::Green);
    builder
        .state(TrafficLight::Green)
        .on_entry(|| println!("  Green  (Go!)"))
        .when(after(300))
        .then(TrafficLight::Yellow);
    builder
        .state(TrafficLight::Yellow)
        .on_entry(|| println!("  Yellow (Caution)"))
        .when(after(100))
        .then(TrafficLight::Red);
    builder
        .states([TrafficLight::Red, TrafficLight::Yellow, TrafficLight::Green])
        .on(Switch::PowerDown)
        .priority(Priority::High)
        .then(TrafficLight::Off);
    builder
        .state(TrafficLight::Off)
        .end()
        .on_entry(|| println!("  Off"));

    let mut machine = builder.build();
    println!("\n{}", dot::render(&machine.structure()));

    println!("Cycling for two seconds:");
    for _ in 0..40 {
        thread::sleep(Duration::from_millis(50));
        machine.poll();
    }

    machine.handle_event(&Switch::PowerDown);
    println!("\nFinished: {}", machine.is_finished());
}
