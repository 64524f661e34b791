use std::io;

use tracing::warn;

use crate::services::parking_service::InputSource;

/// Reads operator answers from stdin, prompting on stdout. Unreadable or
/// unparsable input degrades to values the workflow rejects explicitly.
pub struct ConsoleInput;

impl InputSource for ConsoleInput {
    fn read_selection(&self) -> i32 {
        println!("Please select vehicle type from menu");
        println!("1 CAR");
        println!("2 BIKE");
        match read_trimmed_line() {
            Some(line) => line.parse().unwrap_or(-1),
            None => -1,
        }
    }

    fn read_vehicle_id(&self) -> String {
        println!("Please type the vehicle registration number and press enter key");
        read_trimmed_line().unwrap_or_default()
    }
}

fn read_trimmed_line() -> Option<String> {
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(_) => Some(line.trim().to_string()),
        Err(e) => {
            warn!("Error while reading user input from shell due to: {}", e);
            None
        }
    }
}

/// Operator answers captured from an HTTP request body, replayed to the
/// workflow through the same interface the console uses.
pub struct RequestInput {
    selection: i32,
    vehicle_id: String,
}

impl RequestInput {
    pub fn new(selection: i32, vehicle_id: String) -> Self {
        Self {
            selection,
            vehicle_id,
        }
    }
}

impl InputSource for RequestInput {
    fn read_selection(&self) -> i32 {
        self.selection
    }

    fn read_vehicle_id(&self) -> String {
        self.vehicle_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_input_replays_the_captured_answers() {
        let input = RequestInput::new(2, "AB123CD".to_string());
        assert_eq!(input.read_selection(), 2);
        assert_eq!(input.read_vehicle_id(), "AB123CD");
    }
}
