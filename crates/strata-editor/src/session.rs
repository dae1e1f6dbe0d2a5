//! An editing session: the current world, the database it is saved to,
//! the catalog of saved worlds and the text command prompt.

use strata_io::database::WorldDatabase;
use strata_io::rpc::Scope;
use strata_renderer::camera::Camera;

use crate::catalog::WorldCatalog;
use crate::config::EditorConfig;
use crate::demo::{demo_names, DemoKind};
use crate::error::EditorError;
use crate::workshop::Workshop;
use crate::world::World;

const WORLD_EXTENSION: &str = ".json";

/// What a prompt line did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// A workshop command was started.
    CommandStarted(&'static str),
    /// A session command ran; the text describes the result.
    Done(String),
    /// Neither a workshop alias nor a session command.
    Unhandled,
}

#[derive(Debug)]
pub struct Session {
    pub world: World,
    pub catalog: WorldCatalog,
    config: EditorConfig,
    database: WorldDatabase,
    scope: Scope,
}

impl Session {
    /// Open the configured database and start with the configured world,
    /// or the default world when none is configured or it fails to load.
    pub fn open(config: EditorConfig) -> Result<Self, EditorError> {
        let database = WorldDatabase::open(&config.database_dir, &config.database_label)?;
        let mut scope = Scope::new();
        scope.insert(database.clone());
        let world = World::demo(DemoKind::Default, config.camera(), config.workshop());
        let initial = config.initial_world.clone();

        let mut session = Self {
            world,
            catalog: WorldCatalog::new(),
            config,
            database,
            scope,
        };
        session.refresh_catalog()?;
        if let Some(filename) = initial {
            session.load_world(&filename);
        }
        Ok(session)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn database(&self) -> &WorldDatabase {
        &self.database
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Answer one JSON remote call against the open databases.
    pub fn call(&self, body: &str) -> String {
        self.scope.handle_json(body)
    }

    /// A camera for a replacement world, keeping the current canvas size.
    fn fresh_camera(&self) -> Camera {
        let canvas = self.world.camera.canvas_size();
        Camera::new(canvas.x(), canvas.y(), self.config.camera)
    }

    /// A workshop for a replacement world, keeping the current settings.
    fn fresh_workshop(&self) -> Workshop {
        Workshop::new(self.world.workshop.settings)
    }

    /// Replace the world with a saved one. On failure the error is logged
    /// and the default world is used instead; returns whether the load
    /// succeeded.
    pub fn load_world(&mut self, filename: &str) -> bool {
        let (camera, workshop) = (self.fresh_camera(), self.fresh_workshop());
        match self.database.load_world(filename) {
            Ok(file) => {
                self.world = World::from_file(file, camera, workshop);
                self.world.filename = Some(filename.to_string());
                log::info!(
                    "loaded world '{}': {} layers, {} shapes",
                    filename,
                    self.world.layer_count(),
                    self.world.shape_count()
                );
                true
            }
            Err(err) => {
                log::error!("failed to load world '{filename}': {err}; using the default world");
                self.world = World::demo(DemoKind::Default, camera, workshop);
                false
            }
        }
    }

    /// Save the world under `filename`. The world only takes the new name
    /// once the file is written.
    pub fn save_world(&mut self, filename: &str) -> Result<(), EditorError> {
        let mut file = self.world.to_file();
        file.filename = filename.to_string();
        self.database.save_world(filename, &file)?;
        self.world.filename = Some(filename.to_string());
        self.catalog.insert(filename);
        log::info!("saved world '{}' with {} shapes", filename, file.shape_count());
        Ok(())
    }

    /// Load `filename`, run `frames` headless frames and return the last one
    /// as pretty JSON.
    pub fn render_world(
        &mut self,
        filename: &str,
        frames: Option<u32>,
    ) -> Result<String, EditorError> {
        self.load_world(filename);
        let frames = frames.unwrap_or(self.config.frames);
        let frame = self.world.render_frames(frames, self.config.frame_interval_ms);
        serde_json::to_string_pretty(&frame).map_err(EditorError::Serialize)
    }

    pub fn load_demo(&mut self, kind: DemoKind) {
        let (camera, workshop) = (self.fresh_camera(), self.fresh_workshop());
        self.world = World::demo(kind, camera, workshop);
    }

    /// Re-read the saved world names from the database.
    pub fn refresh_catalog(&mut self) -> Result<usize, EditorError> {
        let names: Vec<String> = self
            .database
            .file_names()?
            .into_iter()
            .filter(|n| n.ends_with(WORLD_EXTENSION))
            .collect();
        self.catalog.set_filenames(&names);
        Ok(names.len())
    }

    /// A saved world by filename or by label.
    fn resolve_world(&self, name: &str) -> String {
        if self.database.contains(name) || name.ends_with(WORLD_EXTENSION) {
            name.to_string()
        } else {
            format!("{name}{WORLD_EXTENSION}")
        }
    }

    /// Run one line typed into the command prompt. Workshop aliases are
    /// tried first, then the session commands.
    pub fn prompt(&mut self, text: &str) -> Result<PromptOutcome, EditorError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(PromptOutcome::Unhandled);
        }
        if self.world.workshop.try_command(text) {
            let name = self
                .world
                .workshop
                .active_command()
                .map(|c| c.name())
                .unwrap_or("command");
            return Ok(PromptOutcome::CommandStarted(name));
        }

        let mut words = text.split_whitespace();
        let (Some(command), argument) = (words.next(), words.next()) else {
            return Ok(PromptOutcome::Unhandled);
        };
        let message = match command {
            "clear" => {
                self.world.clear();
                "world cleared".to_string()
            }
            "snap" => {
                let snap = self.world.workshop.toggle_snap();
                format!("grid snap {}", on_off(snap))
            }
            "physics" => {
                let value = switch(command, argument)?;
                self.world.run_physics(value, None);
                format!("physics {}", on_off(value))
            }
            "static" => {
                let value = switch(command, argument)?;
                self.world.workshop.settings.create_static_shapes = value;
                format!("static shapes {}", on_off(value))
            }
            "focus" => {
                let focus = self.world.toggle_workshop();
                format!("workshop {}", if focus { "focused" } else { "unfocused" })
            }
            "layers" => self
                .world
                .layer_summaries()
                .iter()
                .map(|l| {
                    let marker = if l.active { "*" } else { " " };
                    format!("{marker} {} {} ({} shapes)", l.space.name(), l.depth, l.shape_count)
                })
                .collect::<Vec<_>>()
                .join("\n"),
            "loadworld" => {
                let name = argument.ok_or_else(|| EditorError::Usage("loadworld <name>".into()))?;
                let filename = self.resolve_world(name);
                if self.load_world(&filename) {
                    format!("loaded {filename}")
                } else {
                    format!("could not load {filename}, default world loaded")
                }
            }
            "saveworld" => {
                let name = argument.ok_or_else(|| EditorError::Usage("saveworld <name>".into()))?;
                let filename = self.resolve_world(name);
                self.save_world(&filename)?;
                format!("saved {filename}")
            }
            "serverworlds" => {
                self.refresh_catalog()?;
                let labels: Vec<&str> =
                    self.catalog.entries().iter().map(|e| e.label.as_str()).collect();
                labels.join(", ")
            }
            "demo" | "generateworld" => {
                let name = match command {
                    "generateworld" => DemoKind::Generated.name(),
                    _ => argument.ok_or_else(|| {
                        EditorError::Usage(format!("demo <{}>", demo_names().join("|")))
                    })?,
                };
                let kind = DemoKind::from_name(name)
                    .ok_or_else(|| EditorError::UnknownDemo(name.to_string()))?;
                self.load_demo(kind);
                format!("demo {}", kind.name())
            }
            _ => return Ok(PromptOutcome::Unhandled),
        };
        log::debug!("prompt '{text}': {message}");
        Ok(PromptOutcome::Done(message))
    }
}

fn switch(command: &str, argument: Option<&str>) -> Result<bool, EditorError> {
    match argument {
        Some("on") => Ok(true),
        Some("off") => Ok(false),
        _ => Err(EditorError::Usage(format!("{command} on|off"))),
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
