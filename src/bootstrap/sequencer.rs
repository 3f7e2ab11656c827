//! Bootstrap state machine.
//!
//! ```text
//! Unconfigured --start--> Validating --ok--> Ready --handoff--> HandedOff
//!                              |
//!                              +--err--> Failed
//! ```
//!
//! Configuration errors are not transient, so `Failed` is terminal: the
//! recorded error is returned again on every later call.

use std::fmt;

use log::{debug, error, info};

use super::ZigbeeStack;
use crate::config::assemble::requested_role;
use crate::config::{
    assemble, ConfigError, ConfigOverrides, DeviceRole, GatewayConfig, GatewayDefaults,
    RoleDescriptor,
};
use crate::security::InstallCodeEntry;

/// Sequencer state. `Ready` and `HandedOff` carry the validated config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Unconfigured,
    Validating,
    Ready(GatewayConfig),
    HandedOff(GatewayConfig),
    Failed(ConfigError),
}

impl BootstrapState {
    fn name(&self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::Validating => "validating",
            Self::Ready(_) => "ready",
            Self::HandedOff(_) => "handed-off",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for BootstrapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(e) => write!(f, "failed ({})", e),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Owns the startup inputs and the state machine.
pub struct BootstrapSequencer {
    defaults: GatewayDefaults,
    overrides: ConfigOverrides,
    role: RoleDescriptor,
    install_codes: Vec<InstallCodeEntry>,
    state: BootstrapState,
}

impl BootstrapSequencer {
    /// Create a sequencer in the `Unconfigured` state.
    pub fn new(defaults: GatewayDefaults, overrides: ConfigOverrides, role: RoleDescriptor) -> Self {
        Self {
            defaults,
            overrides,
            role,
            install_codes: Vec::new(),
            state: BootstrapState::Unconfigured,
        }
    }

    /// Queue install codes to register after handoff.
    ///
    /// Requires a coordinator with the install-code policy enabled; otherwise
    /// [`BootstrapSequencer::start`] fails.
    pub fn with_install_codes(mut self, codes: Vec<InstallCodeEntry>) -> Self {
        self.install_codes = codes;
        self
    }

    /// Current state.
    pub fn state(&self) -> &BootstrapState {
        &self.state
    }

    /// The validated configuration, once `Ready` or `HandedOff`.
    pub fn config(&self) -> Option<&GatewayConfig> {
        match &self.state {
            BootstrapState::Ready(config) | BootstrapState::HandedOff(config) => Some(config),
            _ => None,
        }
    }

    /// Assemble and validate the configuration.
    ///
    /// Runs the assembler only from `Unconfigured`. Later calls return the
    /// existing configuration, or the recorded error after a failure.
    pub fn start(&mut self) -> Result<GatewayConfig, ConfigError> {
        match self.state {
            BootstrapState::Unconfigured => {}
            BootstrapState::Validating => return Err(ConfigError::NotReady),
            BootstrapState::Ready(config) | BootstrapState::HandedOff(config) => {
                return Ok(config)
            }
            BootstrapState::Failed(e) => return Err(e),
        }

        self.transition(BootstrapState::Validating);
        info!(
            "Assembling {} configuration",
            requested_role(&self.role, &self.overrides)
        );

        match assemble(&self.defaults, &self.overrides, &self.role)
            .and_then(|config| self.check_install_codes(&config).map(|()| config))
        {
            Ok(config) => {
                info!("Configuration ready: {}", config);
                self.transition(BootstrapState::Ready(config));
                Ok(config)
            }
            Err(e) => {
                error!("Configuration rejected: {}", e);
                self.transition(BootstrapState::Failed(e));
                Err(e)
            }
        }
    }

    /// Pass the configuration to the stack.
    ///
    /// Succeeds once, from `Ready`. A second call fails with
    /// [`ConfigError::AlreadyHandedOff`] without touching the stack.
    pub fn handoff<S: ZigbeeStack + ?Sized>(&mut self, stack: &mut S) -> Result<(), ConfigError> {
        let config = match self.state {
            BootstrapState::Ready(config) => config,
            BootstrapState::HandedOff(_) => {
                error!("Refusing second handoff");
                return Err(ConfigError::AlreadyHandedOff);
            }
            BootstrapState::Failed(e) => return Err(e),
            BootstrapState::Unconfigured | BootstrapState::Validating => {
                return Err(ConfigError::NotReady)
            }
        };

        info!("Handing configuration to the Zigbee stack");
        stack.init(config);

        let count = self.install_codes.len();
        for entry in self.install_codes.drain(..) {
            debug!("Registering install code for {:016x}", entry.ieee_addr);
            stack.add_install_code(entry.ieee_addr, &entry.code);
        }
        if count > 0 {
            info!("Registered {} install code(s)", count);
        }

        self.transition(BootstrapState::HandedOff(config));
        Ok(())
    }

    /// Start and hand off in one step.
    pub fn run<S: ZigbeeStack + ?Sized>(&mut self, stack: &mut S) -> Result<(), ConfigError> {
        self.start()?;
        self.handoff(stack)
    }

    fn check_install_codes(&self, config: &GatewayConfig) -> Result<(), ConfigError> {
        if self.install_codes.is_empty() || config.role().install_code_policy() {
            return Ok(());
        }
        Err(ConfigError::InvalidRoleParameter {
            role: config.role().role(),
            field: "install_code_policy",
            constraint: if config.role().role() == DeviceRole::Coordinator {
                "install codes given but policy is disabled"
            } else {
                "install codes require the coordinator role"
            },
        })
    }

    fn transition(&mut self, next: BootstrapState) {
        debug!("Bootstrap: {} -> {}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_role;
    use crate::security::{install_code_crc, InstallCode};

    #[derive(Default)]
    struct CountingStack {
        inits: usize,
        codes: Vec<u64>,
    }

    impl ZigbeeStack for CountingStack {
        fn init(&mut self, _config: GatewayConfig) {
            self.inits += 1;
        }

        fn add_install_code(&mut self, ieee_addr: u64, _code: &InstallCode) {
            self.codes.push(ieee_addr);
        }
    }

    fn sequencer(overrides: ConfigOverrides) -> BootstrapSequencer {
        BootstrapSequencer::new(GatewayDefaults::thermostat(), overrides, default_role())
    }

    fn entry(ieee_addr: u64) -> InstallCodeEntry {
        let mut bytes = vec![0x11; 8];
        let crc = install_code_crc(&bytes);
        bytes.extend_from_slice(&crc.to_le_bytes());
        InstallCodeEntry {
            ieee_addr,
            code: InstallCode::from_bytes(&bytes).unwrap(),
        }
    }

    #[test]
    fn test_initial_state() {
        let seq = sequencer(ConfigOverrides::new());
        assert_eq!(*seq.state(), BootstrapState::Unconfigured);
        assert!(seq.config().is_none());
    }

    #[test]
    fn test_start_reaches_ready() {
        let mut seq = sequencer(ConfigOverrides::new());
        let config = seq.start().unwrap();
        assert_eq!(*seq.state(), BootstrapState::Ready(config));
        assert_eq!(seq.config(), Some(&config));
    }

    #[test]
    fn test_start_is_idempotent_once_ready() {
        let mut seq = sequencer(ConfigOverrides::new());
        let first = seq.start().unwrap();
        assert_eq!(seq.start().unwrap(), first);
    }

    #[test]
    fn test_failure_is_terminal() {
        let mut seq = sequencer(ConfigOverrides {
            channel_mask: Some(0),
            ..Default::default()
        });
        assert_eq!(seq.start(), Err(ConfigError::EmptyMask));
        assert_eq!(*seq.state(), BootstrapState::Failed(ConfigError::EmptyMask));
        // No retry
        assert_eq!(seq.start(), Err(ConfigError::EmptyMask));

        let mut stack = CountingStack::default();
        assert_eq!(seq.handoff(&mut stack), Err(ConfigError::EmptyMask));
        assert_eq!(stack.inits, 0);
    }

    #[test]
    fn test_handoff_before_start() {
        let mut seq = sequencer(ConfigOverrides::new());
        let mut stack = CountingStack::default();
        assert_eq!(seq.handoff(&mut stack), Err(ConfigError::NotReady));
        assert_eq!(stack.inits, 0);
    }

    #[test]
    fn test_second_handoff_rejected() {
        let mut seq = sequencer(ConfigOverrides::new());
        let mut stack = CountingStack::default();
        seq.run(&mut stack).unwrap();
        let handed = *seq.state();

        assert_eq!(seq.handoff(&mut stack), Err(ConfigError::AlreadyHandedOff));
        assert_eq!(stack.inits, 1);
        assert_eq!(*seq.state(), handed);
    }

    #[test]
    fn test_install_codes_registered_after_init() {
        let mut seq = sequencer(ConfigOverrides {
            install_code_policy: Some(true),
            ..Default::default()
        })
        .with_install_codes(vec![entry(1), entry(2)]);
        let mut stack = CountingStack::default();
        seq.run(&mut stack).unwrap();
        assert_eq!(stack.inits, 1);
        assert_eq!(stack.codes, vec![1, 2]);
    }

    #[test]
    fn test_install_codes_need_policy() {
        let mut seq = sequencer(ConfigOverrides::new()).with_install_codes(vec![entry(1)]);
        assert!(matches!(
            seq.start(),
            Err(ConfigError::InvalidRoleParameter {
                field: "install_code_policy",
                ..
            })
        ));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(BootstrapState::Unconfigured.to_string(), "unconfigured");
        assert_eq!(
            BootstrapState::Failed(ConfigError::EmptyMask).to_string(),
            "failed (channel_mask: no channel selected)"
        );
    }
}
