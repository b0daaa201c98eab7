//! Handler registrations for the space/date skill.

use chrono::{Datelike, NaiveDate};
use skill_core::dispatcher::HandlerError;
use skill_core::{HandlerTable, ResponseBuilder};
use tracing::debug;

use crate::dates::{day_of_year, iso_week_number, iso_week_year, ordinal};
use crate::facts::random_fact;

/// Intent names from the interaction model. Case-sensitive.
pub mod intents {
    pub const GET_WEEK_NUMBER: &str = "GetWeekNumber";
    pub const GET_DAY_OF_YEAR: &str = "GetDayOfYear";
    pub const GET_TODAY: &str = "GetToday";
    pub const GET_TIME: &str = "GetTime";
    pub const HELP: &str = "AMAZON.HelpIntent";
    pub const STOP: &str = "AMAZON.StopIntent";
    pub const CANCEL: &str = "AMAZON.CancelIntent";
}

pub const HELP_SPEECH: &str = "You can say what week of the year is it, or, what day is it, or, you can say exit... What can I help you with?";
pub const HELP_REPROMPT: &str = "What can I help you with?";
pub const GOODBYE_SPEECH: &str = "Goodbye";
pub const FACT_CARD_TITLE: &str = "Space Fact";
pub const WEEK_CARD_TITLE: &str = "Week of year";
pub const DAY_CARD_TITLE: &str = "Day of year";

/// Build the handler table for this skill.
pub fn build_handler_table() -> HandlerTable {
    HandlerTable::builder()
        .on_session_started(|request, session| {
            debug!(
                request_id = %request.request_id,
                session_id = %session.session_id,
                "new session"
            );
            Ok(())
        })
        .on_launch(|_, _, response| new_fact(response))
        .on_session_ended(|request, session| {
            debug!(
                request_id = %request.request_id,
                session_id = %session.session_id,
                "session closed"
            );
            Ok(())
        })
        .intent(intents::GET_WEEK_NUMBER, |request, _, response| {
            let speech = week_number_speech(request.timestamp.date_naive());
            response.tell_with_card(speech.clone(), WEEK_CARD_TITLE, speech)?;
            Ok(())
        })
        .intent(intents::GET_DAY_OF_YEAR, |request, _, response| {
            let speech = day_of_year_speech(request.timestamp.date_naive());
            response.tell_with_card(speech.clone(), DAY_CARD_TITLE, speech)?;
            Ok(())
        })
        // Not implemented yet: the builder is left untouched and the
        // dispatcher answers without speech.
        .intent(intents::GET_TODAY, |_, _, _| Ok(()))
        .intent(intents::GET_TIME, |_, _, _| Ok(()))
        .intent(intents::HELP, |_, _, response| {
            response.ask(HELP_SPEECH, HELP_REPROMPT)?;
            Ok(())
        })
        .intent(intents::STOP, |_, _, response| {
            response.tell(GOODBYE_SPEECH)?;
            Ok(())
        })
        .intent(intents::CANCEL, |_, _, response| {
            response.tell(GOODBYE_SPEECH)?;
            Ok(())
        })
        .build()
}

/// Speak a random fact and keep the session open.
fn new_fact(response: &mut ResponseBuilder) -> Result<(), HandlerError> {
    let fact = random_fact(&mut rand::rng());
    response.ask_with_card(
        format!("Here's your space fact: {fact} What else can I help you with?"),
        HELP_REPROMPT,
        FACT_CARD_TITLE,
        fact,
    )?;
    Ok(())
}

pub fn week_number_speech(date: NaiveDate) -> String {
    let week = iso_week_number(date);
    format!(
        "This is the {} week of {}",
        ordinal(i64::from(week)),
        iso_week_year(date)
    )
}

pub fn day_of_year_speech(date: NaiveDate) -> String {
    let day = day_of_year(date);
    format!("This is the {} day of {}", ordinal(i64::from(day)), date.year())
}
