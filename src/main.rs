use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use clap::Parser;
use winit::event_loop::EventLoop;

use keychord::cli::CliArgs;
use keychord::runtime::{build_keyboard, App};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    keychord::tracing::init();

    let startup = args.into_config()?;

    if startup.list_only {
        let quit = Rc::new(Cell::new(false));
        let keyboard = build_keyboard(startup.keyboard, &startup.keymap, &quit)?;
        for line in keyboard.describe() {
            println!("{}", line);
        }
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(startup.keyboard, startup.keymap);

    event_loop.run_app(&mut app)?;

    Ok(())
}
