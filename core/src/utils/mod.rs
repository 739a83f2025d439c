mod container_info;
pub use container_info::{ContainerInfo, ContainerInfoComponent};

mod logger;
pub use logger::{ConsoleLogger, Logger, NullLogger};

pub fn get_env_bool(variable_name: impl AsRef<str>) -> Option<bool> {
    let variable_name = variable_name.as_ref();
    std::env::var(variable_name)
        .ok()
        .map(|val| match val.to_lowercase().as_str() {
            "1" | "true" | "on" => true,
            "0" | "false" | "off" => false,
            _ => panic!("invalid environment variable value: {}", variable_name),
        })
}
