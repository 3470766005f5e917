use std::io::{self, BufRead, Write};
use std::sync::Arc;

use jetway_core::validation::DetailField;
use jetway_core::{country_for_dial, COUNTRY_CODES};
use jetway_flow::{FlowController, FlowOutcome, Step};
use jetway_kiosk::screens::{
    BoardingPassView, DeclarationView, FindBookingView, PassengerDetailsView, SelectPassengersView,
};
use jetway_service::{AppConfig, MockBookingService, Notifier, Severity};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prints notifications straight onto the kiosk console.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show_message(&self, title: &str, body: &str, severity: Severity) {
        match severity {
            Severity::Error => println!("\n !! {}: {}", title, body),
            _ => println!("\n -- {}: {}", title, body),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jetway_kiosk=warn,jetway_flow=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    tracing::info!("starting {} kiosk", config.branding.carrier_name);

    let service = Arc::new(MockBookingService::with_seed_data(config.mock.latency_ms));
    let notifier = Arc::new(ConsoleNotifier);
    let mut controller =
        FlowController::new(service, notifier, &config.checkin.default_country_code);

    println!("{} self-service check-in", config.branding.carrier_name);
    println!("Demo booking: reference ABC123, last name HUUM");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        render(&controller, &config);
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if !dispatch(&mut controller, line.trim()).await {
            break;
        }
    }
    Ok(())
}

fn render(controller: &FlowController, config: &AppConfig) {
    let step = controller.current_step();
    println!();
    println!(
        "=== {} ({}%) ===",
        step.title(),
        controller.progress_percent()
    );

    if controller.cancel_armed() {
        println!("Cancel this check-in and start over? (yes/no)");
        return;
    }

    match step {
        Step::FindBooking => {
            let view = FindBookingView::project(controller);
            println!("Reference: {}", view.booking_ref);
            println!("Last name: {}", view.last_name);
            if view.busy {
                println!("Looking up your booking...");
            } else if !view.can_submit {
                println!("(need a reference of 6+ characters and a last name)");
            }
            println!("Commands: ref <value> | name <value> | go | quit");
        }
        Step::SelectPassengers => {
            let view = SelectPassengersView::project(controller);
            for (i, row) in view.rows.iter().enumerate() {
                let mark = if row.selected { "x" } else { " " };
                println!(
                    "[{}] {}. {:<24} {:<7} Seat {}",
                    mark,
                    i + 1,
                    row.name,
                    row.type_label,
                    row.seat_label
                );
            }
            println!("Commands: toggle <n> | all | go | back | cancel");
        }
        Step::PassengerDetails => {
            let view = PassengerDetailsView::project(controller);
            for (i, card) in view.cards.iter().enumerate() {
                println!("{}. {}", i + 1, card.name);
                print!("   Nationality [{}]", card.nationality.value);
                if let Some(error) = card.nationality.error {
                    print!("  <- {}", error);
                }
                println!();
                let prefix = match country_for_dial(&card.country_code) {
                    Some(country) => format!("{} {}", card.country_code, country.iso),
                    None => card.country_code.clone(),
                };
                print!("   Phone ({}) [{}]", prefix, card.phone.value);
                if let Some(error) = card.phone.error {
                    print!("  <- {}", error);
                }
                println!();
            }
            if view.busy {
                println!("Saving details...");
            }
            println!(
                "Commands: nat <n> <code> | phone <n> <number> | code <n> <dial> | codes | go | back | cancel"
            );
        }
        Step::Declaration => {
            let view = DeclarationView::project(controller);
            println!("I confirm no dangerous goods are in my baggage:");
            println!("flammables, explosives, compressed gases or corrosives.");
            println!("Accepted: [{}]", if view.accepted { "x" } else { " " });
            if view.busy {
                println!("Completing check-in...");
            }
            println!("Commands: accept | go | back | cancel");
        }
        Step::BoardingPass => {
            match BoardingPassView::project(controller, config.checkin.boarding_lead_minutes) {
                Some(view) => {
                    println!("{}  {}", view.flight_number, view.route);
                    println!(
                        "{} {}   Departure {}   Boarding {}",
                        view.weekday, view.date, view.departure_time, view.boarding_time
                    );
                    println!("Terminal {}   Gate {}", view.terminal, view.gate);
                    for card in &view.cards {
                        println!(
                            "  {:<24} Seat {:<5} Zone {:<3} Seq {}",
                            card.passenger_name, card.seat, card.zone, card.sequence
                        );
                    }
                }
                None => println!("No boarding data available."),
            }
            println!("Commands: restart | quit");
        }
    }
}

async fn dispatch(controller: &mut FlowController, input: &str) -> bool {
    if input == "quit" {
        return false;
    }

    if controller.cancel_armed() {
        if input == "yes" {
            controller.confirm_cancel();
        } else {
            controller.dismiss_cancel();
        }
        return true;
    }

    match input {
        "back" => {
            controller.back();
            return true;
        }
        "cancel" => {
            controller.request_cancel();
            return true;
        }
        _ => {}
    }

    let outcome = match controller.current_step() {
        Step::FindBooking => {
            if let Some(value) = input.strip_prefix("ref ") {
                controller.set_booking_ref(value.trim());
                return true;
            }
            if let Some(value) = input.strip_prefix("name ") {
                controller.set_last_name(value.trim());
                return true;
            }
            if input == "go" {
                controller.submit_lookup().await
            } else {
                return true;
            }
        }
        Step::SelectPassengers => {
            if let Some((index, _)) = parse_indexed(input, "toggle") {
                let view = SelectPassengersView::project(controller);
                if let Some(row) = view.rows.get(index) {
                    controller.toggle_passenger(&row.key);
                }
                return true;
            }
            match input {
                "all" => {
                    controller.select_all();
                    return true;
                }
                "go" => controller.confirm_selection(),
                _ => return true,
            }
        }
        Step::PassengerDetails => {
            if let Some((index, value)) = parse_indexed(input, "nat") {
                update_card(controller, index, DetailField::Nationality, value);
                return true;
            }
            if let Some((index, value)) = parse_indexed(input, "phone") {
                update_card(controller, index, DetailField::Phone, value);
                return true;
            }
            if let Some((index, value)) = parse_indexed(input, "code") {
                if country_for_dial(value).is_none() {
                    println!("Unknown dialing code. Type codes to list them.");
                    return true;
                }
                let keys: Vec<_> = controller.form().keys().to_vec();
                if let Some(key) = keys.get(index) {
                    controller.set_country_code(key, value);
                }
                return true;
            }
            if input == "codes" {
                for country in COUNTRY_CODES {
                    println!("  {:<5} {}  {}", country.dial, country.iso, country.name);
                }
                return true;
            }
            if input == "go" {
                // surface every inline error before the attempt
                if !controller.details_valid() {
                    let keys: Vec<_> = controller.form().keys().to_vec();
                    for key in &keys {
                        controller.touch_detail(key, DetailField::Nationality);
                        controller.touch_detail(key, DetailField::Phone);
                    }
                }
                controller.submit_details().await
            } else {
                return true;
            }
        }
        Step::Declaration => match input {
            "accept" => {
                let accepted = controller.declaration_accepted();
                controller.set_declaration_accepted(!accepted);
                return true;
            }
            "go" => {
                if !controller.declaration_accepted() {
                    println!("Please accept the declaration first.");
                    return true;
                }
                controller.accept_declaration().await
            }
            _ => return true,
        },
        Step::BoardingPass => {
            if input == "restart" {
                controller.request_cancel();
                controller.confirm_cancel();
            }
            return true;
        }
    };

    if outcome == FlowOutcome::Busy {
        println!("Still working, one moment.");
    }
    true
}

fn update_card(controller: &mut FlowController, index: usize, field: DetailField, value: &str) {
    let keys: Vec<_> = controller.form().keys().to_vec();
    if let Some(key) = keys.get(index) {
        controller.update_detail(key, field, value);
        controller.touch_detail(key, field);
    }
}

/// Parse "cmd <n> [value]" with a 1-based index.
fn parse_indexed<'a>(input: &'a str, command: &str) -> Option<(usize, &'a str)> {
    let rest = input.strip_prefix(command)?.trim_start();
    if rest.is_empty() {
        return None;
    }
    let (index_text, value) = match rest.split_once(' ') {
        Some((index_text, value)) => (index_text, value.trim()),
        None => (rest, ""),
    };
    let index: usize = index_text.parse().ok()?;
    index.checked_sub(1).map(|i| (i, value))
}
