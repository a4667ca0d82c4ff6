//! This module provides ways to tweak mocked services, so that they can return errors on some tests

use std::error::Error;

/// This stores some behaviour tweaks, that describe how a mocked instance will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    // From the MessageStore trait
    pub add_message_behaviour: (u32, u32),
    pub subscribe_behaviour: (u32, u32),

    // From the WeatherSource trait
    pub fetch_weather_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All actions will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            add_message_behaviour: (0, n_fails),
            subscribe_behaviour: (0, n_fails),
            fetch_weather_behaviour: (0, n_fails),
        }
    }

    pub fn can_add_message(&mut self) -> Result<(), Box<dyn Error>> {
        decrement(&mut self.add_message_behaviour, "add_message")
    }
    pub fn can_subscribe(&mut self) -> Result<(), Box<dyn Error>> {
        decrement(&mut self.subscribe_behaviour, "subscribe")
    }
    pub fn can_fetch_weather(&mut self) -> Result<(), Box<dyn Error>> {
        decrement(&mut self.fetch_weather_behaviour, "fetch_weather")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), Box<dyn Error>> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 = value.0 - 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else {
        if remaining_failures > 0 {
            value.1 = value.1 - 1;
            log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
            Err(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value).into())
        } else {
            log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mock_behaviour() {
        let mut ok = MockBehaviour::new();
        for _ in 0..5 {
            assert!(ok.can_add_message().is_ok());
            assert!(ok.can_fetch_weather().is_ok());
        }

        let mut now = MockBehaviour::fail_now(2);
        assert!(now.can_add_message().is_err());
        assert!(now.can_subscribe().is_err());
        assert!(now.can_subscribe().is_err());
        assert!(now.can_add_message().is_err());
        assert!(now.can_add_message().is_ok());
        assert!(now.can_add_message().is_ok());
        assert!(now.can_subscribe().is_ok());

        let mut custom = MockBehaviour{
            add_message_behaviour: (0,1),
            fetch_weather_behaviour: (1,3),
            ..MockBehaviour::default()
        };
        assert!(custom.can_add_message().is_err());
        assert!(custom.can_add_message().is_ok());
        assert!(custom.can_add_message().is_ok());
        assert!(custom.can_fetch_weather().is_ok());
        assert!(custom.can_fetch_weather().is_err());
        assert!(custom.can_fetch_weather().is_err());
        assert!(custom.can_fetch_weather().is_err());
        assert!(custom.can_fetch_weather().is_ok());
    }
}
