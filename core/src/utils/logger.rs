pub trait Logger: Send + Sync {
    /// Logs the message unless log throttling swallows it. Returns whether
    /// the message was written.
    fn try_log(&self, message: &str) -> bool;

    /// Logs the message unconditionally.
    fn always_log(&self, message: &str);
}

pub struct NullLogger {}

impl NullLogger {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for NullLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for NullLogger {
    fn try_log(&self, _message: &str) -> bool {
        false
    }

    fn always_log(&self, _message: &str) {}
}

pub struct ConsoleLogger {}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for ConsoleLogger {
    fn try_log(&self, message: &str) -> bool {
        self.always_log(message);
        true
    }

    fn always_log(&self, message: &str) {
        println!("{}", message);
    }
}
