use std::env;
use std::path::{Path, PathBuf};

use log::{info, warn};
use moderator_wheel::config::FALLBACK_FONT_PATH;
use moderator_wheel::{Participant, Wheel, WheelConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Parse --title, --font and participant names from the command line
    let mut window_title = "Moderator Wheel".to_string();
    let mut font_path: Option<PathBuf> = None;
    let mut names = Vec::new();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--title" => {
                if let Some(title) = args.next() {
                    window_title = title;
                }
            }
            "--font" => font_path = args.next().map(PathBuf::from),
            _ => names.push(arg),
        }
    }

    if names.is_empty() {
        warn!("no participants given, using a sample meeting");
        names = ["Ada", "Brian", "Cleo", "Dev", "Eve", "Farah"]
            .map(String::from)
            .to_vec();
    }

    let font_path = font_path.or_else(|| {
        let fallback = Path::new(FALLBACK_FONT_PATH);
        fallback.exists().then(|| fallback.to_path_buf())
    });

    let config = WheelConfig::builder()
        .title(window_title)
        .maybe_font_path(font_path)
        .build();

    let participants = Participant::roster(names);
    info!("spinning for {} participants", participants.len());
    println!("Press Space or click the wheel to pick the next moderator.");

    let mut wheel = Wheel::new(config, participants);
    wheel.show()?;

    for (round, chosen) in wheel.session().selected().iter().enumerate() {
        println!("{}. {}", round + 1, chosen.name);
    }
    Ok(())
}
