//! Bakery Demo
//!
//! Plays a short session: the opening story event, a little baking and
//! trading, then a repeatable customer visit. Progress is saved to a JSON
//! file so running the demo twice continues where it left off.
//!
//! Set `RUST_LOG=debug` to see store and playback logs.

use reminiscence_catalog::ItemCatalog;
use reminiscence_event::{EventBook, EventStep, Notification, PlaybackState};
use reminiscence_game::Director;
use reminiscence_save::{FileStorage, SaveStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const EVENTS: &str = include_str!("../assets/events.ron");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Reminiscence Bakery Demo ===\n");

    let save_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("reminiscence_bakery.json"));
    println!("Save file: {}\n", save_path.display());

    let mut events = EventBook::new();
    events.load_str(EVENTS)?;
    events.validate()?;

    let store = SaveStore::new(FileStorage::new(&save_path));
    let mut director = Director::new(store, ItemCatalog::bakery()?, events);
    let restored = director.load()?;
    if !restored {
        println!("No previous save, starting fresh.");
    }

    let locale = director.store().language().to_string();
    narrate(&mut director, &locale);

    print_slot(&director)?;

    // Finish anything left over from the last run before starting new events.
    if let Some(ongoing) = director.ongoing_event()? {
        println!("\nResuming {}", ongoing);
        play_out(&mut director, None)?;
    }

    if director
        .eligible_events()?
        .iter()
        .any(|id| id.as_str() == "opening_day")
    {
        play_out(&mut director, Some("opening_day"))?;
    }

    println!("\n--- Baking ---");
    match director.craft("whiteBread") {
        Ok(units) => println!("Baked {} white bread", units),
        Err(e) => println!("Could not bake: {}", e),
    }
    match director.sell("whiteBread", 1) {
        Ok(income) => println!("Sold a loaf for {:.1}", income),
        Err(e) => println!("Could not sell: {}", e),
    }
    let units = director.buy("sesame", 1)?;
    println!("Bought {} sesame", units);

    for _ in 0..2 {
        play_out(&mut director, Some("regular_customer"))?;
    }

    let day = director.slot()?.day;
    let day_path = format!("saves.{}.day", director.active_slot());
    director.store_mut().set(&day_path, i64::from(day) + 1)?;
    println!("\nA new day begins (day {}).", day + 1);
    println!("Eligible events: {:?}", director.eligible_events()?);
    if director
        .eligible_events()?
        .iter()
        .any(|id| id.as_str() == "sesame_delivery")
    {
        play_out(&mut director, Some("sesame_delivery"))?;
    }

    println!();
    print_slot(&director)?;

    println!("\n--- Save slots ---");
    for summary in director.store().summaries()? {
        if summary.occupied {
            println!(
                "  [{}] day {} | money {:.1} | fame {:.1}",
                summary.index, summary.day, summary.money, summary.fame
            );
        } else {
            println!("  [{}] empty", summary.index);
        }
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}

/// Print every step of every event in the chosen language
fn narrate(director: &mut Director<FileStorage>, locale: &str) {
    for event in director.events_mut().iter_mut() {
        let id = event.id().to_string();
        let strings = event
            .language_map()
            .get(locale)
            .cloned()
            .unwrap_or_default();
        event.subscribe(move |notification| match notification {
            Notification::Start(_) => println!("\n>> {}", id),
            Notification::Step(step) => {
                let key = step.text_key();
                let line = strings.get(key).map(String::as_str).unwrap_or(key);
                match step {
                    EventStep::Dialog { name, .. } => println!("   {}: {}", name, line),
                    EventStep::Text(_) => println!("   {}", line),
                }
            }
            Notification::Complete(rewards) => {
                for reward in rewards.iter() {
                    println!("   + {:?}", reward);
                }
            }
        });
    }
}

/// Start an event (or continue the ongoing one) and play it to the end
fn play_out(
    director: &mut Director<FileStorage>,
    start: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = match start {
        Some(id) => director.begin(id)?,
        None => director.advance()?,
    };
    while state != PlaybackState::Completed {
        state = director.advance()?;
    }
    Ok(())
}

fn print_slot(director: &Director<FileStorage>) -> Result<(), Box<dyn std::error::Error>> {
    let slot = director.slot()?;
    println!(
        "Slot {}: day {} | money {:.1} | fame {:.1}",
        director.active_slot(),
        slot.day,
        slot.money,
        slot.fame
    );
    let stock: Vec<String> = slot
        .inventory
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(item, count)| format!("{} x{}", item, count))
        .collect();
    println!("  Inventory: {}", stock.join(", "));
    println!("  Completed: {:?}", slot.completed_events);
    Ok(())
}
