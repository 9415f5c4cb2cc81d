use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyCode};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::actors::{ActorHandle, StoreSyncActor};
use crate::api::ApiClient;
use crate::config::Config;
use crate::render::RenderState;
use crate::store::{SharedTaskStore, TaskStore};
use crate::tea::{update, Command, Message, Model};
use crate::{tlog_debug, Result};

const MAX_BG_MESSAGES: usize = 50;

pub struct LogicThread;

impl LogicThread {
    pub fn run(
        config: Config,
        state_tx: Sender<RenderState>,
        shutdown: Arc<AtomicBool>,
    ) -> Result<()> {
        Runtime::new()?.block_on(Self::run_async(config, state_tx, shutdown))
    }

    async fn run_async(
        config: Config,
        state_tx: Sender<RenderState>,
        shutdown: Arc<AtomicBool>,
    ) -> Result<()> {
        let endpoint = config.effective_endpoint().to_string();
        tlog_debug!("LogicThread::run_async endpoint={}", endpoint);

        let store: SharedTaskStore = Arc::new(TaskStore::new(ApiClient::new(&endpoint)));
        let mut model = Model::new();

        let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<Message>();
        let actors = spawn_actors(msg_tx.clone(), store.clone());

        send_state(&state_tx, &model);
        let mut esc_filter = EscapeSequenceFilter::new();

        // Load the task list as soon as the loop starts
        execute_command(Command::FetchTasks, &store).await;

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            // Keyboard input (priority)
            while event::poll(Duration::ZERO)? {
                match event::read()? {
                    Event::Key(key) => {
                        if let KeyCode::Char(c) = key.code {
                            if esc_filter.filter(c) {
                                continue;
                            }
                        }

                        for cmd in update(&mut model, Message::Key(key)) {
                            if execute_command(cmd, &store).await {
                                shutdown.store(true, Ordering::Relaxed);
                                shutdown_actors(&actors);
                                return Ok(());
                            }
                        }

                        if model.dirty {
                            send_state(&state_tx, &model);
                            model.dirty = false;
                        }
                    }

                    Event::Resize(w, h) => {
                        update(&mut model, Message::Resize(w, h));
                    }

                    _ => {}
                }
            }

            // Background messages (bounded)
            for _ in 0..MAX_BG_MESSAGES {
                let Ok(msg) = msg_rx.try_recv() else { break };
                for cmd in update(&mut model, msg) {
                    if execute_command(cmd, &store).await {
                        shutdown.store(true, Ordering::Relaxed);
                        shutdown_actors(&actors);
                        return Ok(());
                    }
                }
            }

            if model.dirty {
                send_state(&state_tx, &model);
                model.dirty = false;
            }

            tokio::time::sleep(Duration::from_micros(500)).await;
        }

        shutdown_actors(&actors);
        Ok(())
    }
}

/// Execute a command against the task store. Store operations run on their
/// own tokio tasks so the input loop never waits on the network; results
/// come back through the store watch channel. Returns true on Quit.
async fn execute_command(cmd: Command, store: &SharedTaskStore) -> bool {
    match cmd {
        Command::FetchTasks => {
            tlog_debug!("Command::FetchTasks");
            let store = store.clone();
            tokio::spawn(async move {
                store.fetch_tasks().await;
            });
        }

        Command::CreateTask { title } => {
            tlog_debug!("Command::CreateTask title={}", title);
            let store = store.clone();
            tokio::spawn(async move {
                store.create_task(&title).await;
            });
        }

        Command::UpdateTask { task_id, done } => {
            tlog_debug!("Command::UpdateTask task_id={} done={}", task_id, done);
            let store = store.clone();
            tokio::spawn(async move {
                store.update_task(task_id, done).await;
            });
        }

        Command::CreateSubTask { task_id, title } => {
            tlog_debug!("Command::CreateSubTask task_id={} title={}", task_id, title);
            let store = store.clone();
            tokio::spawn(async move {
                store.create_sub_task(task_id, &title).await;
            });
        }

        Command::UpdateSubTask {
            task_id,
            sub_task_id,
            done,
        } => {
            tlog_debug!(
                "Command::UpdateSubTask task_id={} sub_task_id={} done={}",
                task_id,
                sub_task_id,
                done
            );
            let store = store.clone();
            tokio::spawn(async move {
                store.update_sub_task(task_id, sub_task_id, done).await;
            });
        }

        Command::Quit => {
            tlog_debug!("Command::Quit");
            return true;
        }
    }

    false
}

fn send_state(state_tx: &Sender<RenderState>, model: &Model) {
    let _ = state_tx.try_send(model.snapshot());
}

fn spawn_actors(msg_tx: mpsc::UnboundedSender<Message>, store: SharedTaskStore) -> Vec<ActorHandle> {
    tlog_debug!("Spawning actors");
    vec![StoreSyncActor::new(msg_tx, store).spawn()]
}

fn shutdown_actors(actors: &[ActorHandle]) {
    tlog_debug!("Shutting down {} actors", actors.len());
    for actor in actors {
        actor.shutdown();
    }
}

struct EscapeSequenceFilter {
    len: u8,
    active: bool,
}

impl EscapeSequenceFilter {
    fn new() -> Self {
        Self {
            len: 0,
            active: false,
        }
    }

    fn filter(&mut self, c: char) -> bool {
        if c == '\x1b' || c == '[' || c == 'O' {
            self.active = true;
            self.len = 1;
            return true;
        }
        if self.active {
            self.len += 1;
            if c.is_ascii_alphabetic() || c == '~' || self.len > 10 {
                self.active = false;
            }
            return true;
        }
        false
    }
}
