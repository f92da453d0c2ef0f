use dotenvy::dotenv;
use lazy_static::lazy_static;
use std::env as std_env;

lazy_static! {
    pub static ref APP_PORT: u16 = load_port();
    pub static ref DATABASE_DIR: String =
        load_or_default(env::DATABASE_DIR_ENV_VAR, DEFAULT_DATABASE_DIR);
    pub static ref DATABASE_FILE: String =
        load_or_default(env::DATABASE_FILE_ENV_VAR, DEFAULT_DATABASE_FILE);
}

fn load_env() {
    dotenv().ok();
}

fn load_or_default(variable_name: &str, default_value: &str) -> String {
    load_env();

    match std_env::var(variable_name) {
        Ok(value) => {
            if value.is_empty() {
                String::from(default_value)
            } else {
                value
            }
        }
        Err(_) => String::from(default_value),
    }
}

fn load_port() -> u16 {
    let port = load_or_default(env::APP_PORT_ENV_VAR, "");
    match port.parse() {
        Ok(port) => port,
        Err(_) => {
            if !port.is_empty() {
                tracing::warn!(
                    "ignoring invalid {}: {port}",
                    env::APP_PORT_ENV_VAR
                );
            }
            DEFAULT_APP_PORT
        }
    }
}

pub mod env {
    pub const APP_ADDRESS_ENV_VAR: &str = "APP_ADDRESS";
    pub const APP_PORT_ENV_VAR: &str = "APP_PORT";
    pub const DATABASE_DIR_ENV_VAR: &str = "DATABASE_DIR";
    pub const DATABASE_FILE_ENV_VAR: &str = "DATABASE_FILE";
}

pub const DEFAULT_APP_PORT: u16 = 8080;
pub const DEFAULT_DATABASE_DIR: &str = ".";
pub const DEFAULT_DATABASE_FILE: &str = "members.redb";

pub mod prod {
    pub const APP_HOST: &str = "0.0.0.0";
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
}
