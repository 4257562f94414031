use std::time::Duration;

use apdu_core::apdu::{ApduAnswer, ApduCommand, HEADER_LEN};
use apdu_core::backend::Backend;
use apdu_core::error::DeviceError;
use apdu_core::instruction::{BOILERPLATE_CLA, Instruction};
use apdu_core::status::AppSW;
use apdu_core::version::AppVersion;
use log::{debug, info, warn};

/// Milliseconds the device clock advances on every ticker event.
pub const TICK_MS: u32 = 100;

/// What the emulated device currently draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    /// The application icon.
    Home,
    /// A check mark above "Message Received".
    MessageReceived,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Class byte commands must carry.
    pub cla: u8,
    /// When set, get version answers with this `major.minor.patch` instead of an empty payload.
    pub version_reply: Option<String>,
    /// Wall clock time spent per ticker event.
    pub tick_interval: Duration,
    /// How long the message stays on screen, in device milliseconds.
    pub display_time_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cla: BOILERPLATE_CLA,
            version_reply: None,
            tick_interval: Duration::from_millis(TICK_MS as u64),
            display_time_ms: 2000,
        }
    }
}

/// The boilerplate application. Feed it raw APDUs with [App::process] or use it
/// directly as a [Backend].
#[derive(Debug)]
pub struct App {
    config: AppConfig,
    screen: Screen,
    history: Vec<Screen>,
    ticks: u64,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let mut app = Self {
            config,
            screen: Screen::Home,
            history: Vec::new(),
            ticks: 0,
        };
        app.display(Screen::Home);
        app
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Every screen drawn since start up, oldest first.
    pub fn history(&self) -> &[Screen] {
        &self.history
    }

    /// Ticker events consumed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Handles one raw command and produces the answer the device would send.
    pub fn process(&mut self, raw: &[u8]) -> ApduAnswer {
        debug!("=> {}", hex::encode(raw));
        let answer = match self.dispatch(raw) {
            Ok(answer) => answer,
            Err(sw) => {
                warn!("rejected command {}: {:?}", hex::encode(raw), sw);
                ApduAnswer::from_status(sw)
            }
        };
        debug!("<= {}", hex::encode(answer.to_bytes()));
        answer
    }

    fn dispatch(&mut self, raw: &[u8]) -> Result<ApduAnswer, AppSW> {
        if raw.len() < HEADER_LEN {
            return Err(AppSW::WrongApduLength);
        }
        if raw[0] != self.config.cla {
            return Err(AppSW::ClaNotSupported);
        }

        let command = ApduCommand::from_bytes(raw).map_err(|_| AppSW::WrongApduLength)?;
        let instruction = Instruction::try_from(&command)?;
        self.handle_apdu(instruction)
    }

    fn handle_apdu(&mut self, instruction: Instruction) -> Result<ApduAnswer, AppSW> {
        match instruction {
            Instruction::GetVersion => self.handler_get_version(),
        }
    }

    fn handler_get_version(&mut self) -> Result<ApduAnswer, AppSW> {
        self.display(Screen::MessageReceived);
        self.wait_ticker();
        self.display(Screen::Home);

        match &self.config.version_reply {
            None => Ok(ApduAnswer::from_status(AppSW::Ok)),
            Some(version) => {
                let version = AppVersion::parse(version).ok_or(AppSW::VersionParsingFail)?;
                ApduAnswer::new(&version.to_bytes(), AppSW::Ok).map_err(|_| AppSW::VersionParsingFail)
            }
        }
    }

    fn wait_ticker(&mut self) {
        let mut elapsed_time = 0;
        while elapsed_time < self.config.display_time_ms {
            std::thread::sleep(self.config.tick_interval);
            elapsed_time += TICK_MS;
            self.ticks += 1;
        }
    }

    fn display(&mut self, screen: Screen) {
        info!("screen: {:?}", screen);
        self.screen = screen;
        self.history.push(screen);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl Backend for App {
    fn exchange(&mut self, command: &ApduCommand) -> Result<ApduAnswer, DeviceError> {
        Ok(self.process(&command.to_bytes()))
    }
}
