/*
 * The terminal host. It plays the part of the page: it feeds `AppEvent`s into
 * `VocabAppLogic`, renders the `UiCommand`s that come back, and runs the only
 * asynchronous job, the dictionary load, on a worker thread.
 *
 * All events reach the logic through one channel and are handled one at a time
 * on the calling thread. Stdin lines and finished loads are both just messages
 * on that channel. Input that arrives while a load is in flight is held back
 * and replayed once the load has resolved, and the end of input does not end
 * the session before that.
 */
pub mod input;
pub mod render;
pub mod types;

use crate::app_logic::VocabAppLogic;
use crate::core::{DictionaryLoaderOperations, LoadError, LoadOutcome};
use input::{ConsoleInput, HELP_TEXT};
use render::ConsoleRenderer;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use types::{AppEvent, UiCommand};

#[derive(Debug)]
pub enum HostMessage {
    Input(String),
    InputClosed,
    DictionaryLoaded(Result<LoadOutcome, LoadError>),
}

pub struct ConsoleHost<W: Write> {
    logic: VocabAppLogic,
    loader: Arc<dyn DictionaryLoaderOperations>,
    dictionary_path: PathBuf,
    renderer: ConsoleRenderer<W>,
    sender: Sender<HostMessage>,
    receiver: Receiver<HostMessage>,
    loads_in_flight: usize,
    held_events: Vec<AppEvent>,
}

impl<W: Write> ConsoleHost<W> {
    pub fn new(
        logic: VocabAppLogic,
        loader: Arc<dyn DictionaryLoaderOperations>,
        dictionary_path: PathBuf,
        renderer: ConsoleRenderer<W>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        ConsoleHost {
            logic,
            loader,
            dictionary_path,
            renderer,
            sender,
            receiver,
            loads_in_flight: 0,
            held_events: Vec::new(),
        }
    }

    pub fn sender(&self) -> Sender<HostMessage> {
        self.sender.clone()
    }

    /*
     * Forwards stdin lines to the host channel from a background thread. The
     * thread ends at end of input or when the host has gone away.
     */
    pub fn spawn_stdin_reader(&self) {
        let sender = self.sender();
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if sender.send(HostMessage::Input(line)).is_err() {
                    return;
                }
            }
            let _ = sender.send(HostMessage::InputClosed);
        });
    }

    fn spawn_load(&mut self, known_checksum: Option<String>) {
        self.loads_in_flight += 1;
        let loader = Arc::clone(&self.loader);
        let path = self.dictionary_path.clone();
        let sender = self.sender();
        log::debug!("ConsoleHost: Starting dictionary load from {path:?}");
        thread::spawn(move || {
            let result = loader.load(&path, known_checksum.as_deref());
            let _ = sender.send(HostMessage::DictionaryLoaded(result));
        });
    }

    fn dispatch(&mut self, event: AppEvent) -> io::Result<()> {
        self.logic.handle_event(event);
        while let Some(command) = self.logic.try_dequeue_command() {
            if let UiCommand::LoadDictionary { known_checksum } = command {
                self.spawn_load(known_checksum);
                continue;
            }
            self.renderer.render(&command)?;
        }
        Ok(())
    }

    // Redraw requests are answered right away; they only show the loading text.
    fn dispatch_input(&mut self, event: AppEvent) -> io::Result<()> {
        if self.loads_in_flight > 0 && !matches!(event, AppEvent::RefreshRequested) {
            log::debug!("ConsoleHost: Holding {event:?} until the dictionary has loaded.");
            self.held_events.push(event);
            return Ok(());
        }
        self.dispatch(event)
    }

    fn on_dictionary_loaded(&mut self, result: Result<LoadOutcome, LoadError>) -> io::Result<()> {
        self.loads_in_flight = self.loads_in_flight.saturating_sub(1);
        self.dispatch(AppEvent::DictionaryLoaded(result))?;
        // A replayed reload starts a new load; later events wait for it again.
        for event in std::mem::take(&mut self.held_events) {
            self.dispatch_input(event)?;
        }
        Ok(())
    }

    /*
     * Runs until `quit`, or end of input once no load is in flight. Returns the
     * logic so callers (and tests) can inspect the final session state.
     */
    pub fn run(mut self) -> io::Result<VocabAppLogic> {
        self.dispatch(AppEvent::Started)?;
        let mut input_closed = false;
        while let Ok(message) = self.receiver.recv() {
            match message {
                HostMessage::DictionaryLoaded(result) => {
                    self.on_dictionary_loaded(result)?;
                    if input_closed && self.loads_in_flight == 0 {
                        break;
                    }
                }
                HostMessage::Input(line) => match input::parse_line(&line) {
                    ConsoleInput::Events(events) => {
                        for event in events {
                            self.dispatch_input(event)?;
                        }
                    }
                    ConsoleInput::Help => self.renderer.write_text(HELP_TEXT)?,
                    ConsoleInput::Invalid(message) => {
                        self.renderer.write_text(&format!("? {message}"))?
                    }
                    ConsoleInput::Quit => break,
                },
                HostMessage::InputClosed if self.loads_in_flight > 0 => {
                    log::debug!("ConsoleHost: Input closed, waiting for the dictionary load.");
                    input_closed = true;
                }
                HostMessage::InputClosed => break,
            }
        }
        self.renderer.finish()?;
        log::debug!("ConsoleHost: Session ended.");
        Ok(self.logic)
    }
}
