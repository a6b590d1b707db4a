//! Walkthrough of the hub API: lazy channels, chained registration, fan-out.
//!
//! Run with `cargo run --example usage`.

use event_hub::{Event, EventError, EventHub, Listener};

#[derive(Debug)]
struct Clicked;
impl Event for Clicked {}

#[derive(Debug)]
struct Changed {
    value: u32,
}
impl Event for Changed {}

fn main() -> Result<(), EventError> {
    let mut hub = EventHub::new();

    // First reference to a name materializes the channel.
    hub.channel::<Clicked>("on_click")?
        .add_listener(Listener::new("announce_click", |_| {
            println!("clicked");
        }));
    hub.channel::<Changed>("on_change")?
        .add_listener(Listener::new("announce_change", |event: &Changed| {
            println!("changed to {}", event.value);
        }));

    for i in 0..50u32 {
        if i % 7 == 0 {
            hub.channel::<Clicked>("on_click")?.invoke(&Clicked)?;
            hub.channel::<Changed>("on_change")?
                .invoke(&Changed { value: i })?;
        }
    }

    for channel in hub.iter() {
        println!("{}", channel.describe());
    }
    println!("{hub}");

    Ok(())
}
