//! The `search` command: locate, submit, present, and optionally rate.

use anyhow::{bail, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, info};

use hemaroute_core::feedback::{FeedbackError, CONFIRMATION_MESSAGE, NO_RATING_MESSAGE};
use hemaroute_core::location::CoordinateError;
use hemaroute_core::orchestrator::PickerDemand;
use hemaroute_core::presenter::render;
use hemaroute_core::search::LOCATION_UNAVAILABLE_MESSAGE;
use hemaroute_core::{
    Coordinate, FormInput, LocationFix, LocationPicker, SearchOrchestrator, SubmitOutcome,
};

use crate::state::AppState;
use crate::{Answer, FeedbackArgs, LocationArgs, SearchQuery};

pub async fn run(
    state: &AppState,
    query: SearchQuery,
    location: &LocationArgs,
    feedback: &FeedbackArgs,
    json: bool,
) -> Result<()> {
    if !state.session().is_authenticated() {
        bail!("Not logged in. Run `hemaroute login` or `hemaroute emergency` first.");
    }

    let orchestrator = state.orchestrator();
    let result = search(state, &orchestrator, query, location, feedback, json).await;
    orchestrator.detach();
    result
}

async fn search(
    state: &AppState,
    orchestrator: &SearchOrchestrator,
    query: SearchQuery,
    location: &LocationArgs,
    feedback: &FeedbackArgs,
    json: bool,
) -> Result<()> {
    let fix = establish_location(state, orchestrator, location).await?;
    if !json {
        println!("Near {} ({})", fix.place, fix.coordinate);
    }

    let outcome = match query {
        SearchQuery::Prompt { text } => orchestrator.submit_prompt(text).await?,
        SearchQuery::Form {
            city,
            blood_type,
            category,
            details,
        } => {
            orchestrator
                .submit_form(FormInput {
                    city,
                    blood_type,
                    category,
                    details,
                })
                .await?
        }
    };
    let results = match outcome {
        SubmitOutcome::Completed(results) => results,
        other => bail!("Search did not complete ({:?})", other),
    };

    let view = render(&results);
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", view);
    }

    if let Some(hospital) = &feedback.rate {
        rate(state, orchestrator, hospital, feedback).await?;
    }
    Ok(())
}

/// Automatic acquisition unless a location was given explicitly, in which
/// case the picker decides. A denied acquisition opens the picker on stdin.
async fn establish_location(
    state: &AppState,
    orchestrator: &SearchOrchestrator,
    args: &LocationArgs,
) -> Result<LocationFix> {
    if args.is_empty() {
        if let Some(fix) = orchestrator.locate().await {
            return Ok(fix);
        }
        let PickerDemand::Required(reason) = orchestrator.picker_demand().await else {
            bail!("{}", LOCATION_UNAVAILABLE_MESSAGE);
        };
        eprintln!("{} ({}). Choose one instead.", LOCATION_UNAVAILABLE_MESSAGE, reason);
        let mut picker = state.open_picker()?;
        let mut input = BufReader::new(tokio::io::stdin()).lines();
        return choose_location(orchestrator, &mut picker, &mut input).await;
    }

    orchestrator.request_location_change().await;
    let mut picker = state.open_picker()?;
    match pick(&mut picker, args).await {
        Ok(fix) => {
            orchestrator.apply_location(fix.clone()).await;
            Ok(fix)
        }
        Err(e) => {
            picker.cancel();
            orchestrator.dismiss_picker().await;
            Err(e)
        }
    }
}

/// Drive an open picker from line input and hand the outcome to the
/// orchestrator: a confirmed fix is applied, anything else dismisses it.
async fn choose_location<R>(
    orchestrator: &SearchOrchestrator,
    picker: &mut LocationPicker,
    input: &mut Lines<R>,
) -> Result<LocationFix>
where
    R: AsyncBufRead + Unpin,
{
    match pick_interactively(picker, input).await {
        Ok(Some(fix)) => {
            orchestrator.apply_location(fix.clone()).await;
            Ok(fix)
        }
        Ok(None) => {
            picker.cancel();
            orchestrator.dismiss_picker().await;
            bail!("{}", LOCATION_UNAVAILABLE_MESSAGE)
        }
        Err(e) => {
            picker.cancel();
            orchestrator.dismiss_picker().await;
            Err(e)
        }
    }
}

/// One answer per line: a place name or `lat,lon` moves the marker, a blank
/// line confirms, `q` or end of input cancels.
async fn pick_interactively<R>(
    picker: &mut LocationPicker,
    input: &mut Lines<R>,
) -> Result<Option<LocationFix>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        eprint!("Place name or \"lat,lon\" (empty line confirms, q cancels): ");
        let Some(line) = input.next_line().await? else {
            return Ok(None);
        };

        match line.trim() {
            "q" | "quit" => return Ok(None),
            "" => match picker.confirm() {
                Ok(fix) => return Ok(Some(fix)),
                Err(e) => eprintln!("{}", e),
            },
            answer => {
                let marked = match parse_lat_lon(answer) {
                    Some(Ok(coordinate)) => picker.select(coordinate).map(|_| coordinate),
                    Some(Err(e)) => {
                        eprintln!("{}", e);
                        continue;
                    }
                    None => picker.search_place(answer).await,
                };
                match marked {
                    Ok(coordinate) => eprintln!("Marked {}", coordinate),
                    Err(e) => eprintln!("{}", e),
                }
            }
        }
    }
}

/// `None` when the answer is not a number pair and should be searched as a
/// place name.
fn parse_lat_lon(answer: &str) -> Option<Result<Coordinate, CoordinateError>> {
    let (lat, lon) = answer.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    Some(Coordinate::new(lat, lon))
}

async fn pick(picker: &mut LocationPicker, args: &LocationArgs) -> Result<LocationFix> {
    if let Some(place) = &args.place {
        picker.search_place(place).await?;
    } else if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        picker.select(Coordinate::new(lat, lon)?)?;
    }
    Ok(picker.confirm()?)
}

async fn rate(
    state: &AppState,
    orchestrator: &SearchOrchestrator,
    hospital: &str,
    args: &FeedbackArgs,
) -> Result<()> {
    let selection = orchestrator.select_hospital(hospital).await?;
    let mut modal = state.feedback_collector().open(selection);
    if let Some(answer) = args.helpful {
        modal.set_helpful(answer == Answer::Yes);
    }
    if let Some(comment) = &args.comment {
        modal.set_comment(comment.clone());
    }

    match modal.submit().await {
        Ok(receipt) => {
            debug!(delivered = receipt.delivered, "Feedback confirmed");
            println!("{}", CONFIRMATION_MESSAGE);
            modal.close_after_confirmation().await;
            info!(hospital = modal.hospital_name(), "Feedback closed");
            Ok(())
        }
        Err(FeedbackError::NoRatingSelected) => {
            modal.cancel();
            bail!("{}", NO_RATING_MESSAGE)
        }
        Err(e) => Err(e.into()),
    }
}
