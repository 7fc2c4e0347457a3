use moderator_wheel::{Participant, Wheel, WheelCommand, WheelConfig};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Optional font path as the only argument
    let config = WheelConfig::builder()
        .title("Standup rotation".to_string())
        .maybe_font_path(std::env::args().nth(1).map(Into::into))
        .canvas_size(480)
        .build();

    let team = Participant::roster(["Ada", "Brian", "Cleo", "Dev", "Eve", "Farah", "Gus"]);
    let mut wheel = Wheel::new(config, team.clone());

    let (sender, receiver) = mpsc::channel();

    // Spin every few seconds; start over once everybody had a turn
    thread::spawn(move || {
        let mut spins = 0;
        loop {
            let command = if spins == team.len() {
                spins = 0;
                WheelCommand::ResetHistory
            } else {
                spins += 1;
                WheelCommand::SpinRandom
            };
            if sender.send(command).is_err() {
                break;
            }
            thread::sleep(Duration::from_secs(4));
        }
    });

    println!("Picking a new moderator every four seconds. Close the window to stop.");
    wheel.show_with_commands(receiver)?;
    Ok(())
}
