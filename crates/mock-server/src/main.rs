//! Mock support backend for local widget development.
//!
//! Serves the six endpoints the widget consumes plus the static
//! stylesheet path. Answer moods are keyed off the question text so the
//! suggestion heuristics can be exercised by hand:
//!
//! - questions containing "unknown"   -> plain unhelpful answers
//! - questions containing "rephrase"  -> enhanced fallback answers
//! - questions containing "escalate"  -> an answer that itself offers a ticket
//! - questions containing "pricing"   -> sales-flavored answers (lead bait)
//! - anything else                    -> a generic helpful answer

use std::sync::atomic::{AtomicU64, Ordering};

use clap::Parser;
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use warp::http::StatusCode;
use warp::Filter;

#[derive(Parser, Debug)]
#[command(name = "mock-server", about = "Mock support backend for chatlet")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 8700)]
    port: u16,

    /// Probability [0, 1] of answering any request with a 500
    #[arg(long = "fail-rate", default_value_t = 0.0)]
    fail_rate: f64,
}

static TICKET_COUNTER: AtomicU64 = AtomicU64::new(4200);

#[derive(Debug, Deserialize)]
struct AskBody {
    question: String,
    conversation_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetectIntentBody {
    conversation_id: String,
    chatbot_id: String,
}

#[derive(Debug, Serialize)]
struct AskReply {
    question: String,
    answer: String,
    conversation_id: String,
    processing_time_ms: u64,
}

fn should_fail(fail_rate: f64) -> bool {
    fail_rate > 0.0 && rand::thread_rng().r#gen::<f64>() < fail_rate
}

fn answer_for(question: &str) -> String {
    let lower = question.to_lowercase();
    if lower.contains("unknown") {
        "I don't know the answer to that, unfortunately.".to_string()
    } else if lower.contains("rephrase") {
        "I don't have enough information to answer that question. \
         Could you try rephrasing or asking about something else?"
            .to_string()
    } else if lower.contains("escalate") {
        "I don't have enough information to answer that question. \
         Would you like to create a support ticket so someone can help you with this?"
            .to_string()
    } else if lower.contains("pricing") {
        "Our Starter plan is free, and the Premium plan unlocks the full feature set. \
         Happy to go into detail on either!"
            .to_string()
    } else {
        format!(
            "Here's what I found about \"{}\": everything looks good on our end.",
            question
        )
    }
}

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let args = Args::parse();
    let fail_rate = args.fail_rate;

    let with_fail = move || {
        warp::any().and_then(move || async move {
            if should_fail(fail_rate) {
                Err(warp::reject::custom(InjectedFailure))
            } else {
                Ok(())
            }
        })
    };

    // POST /chatbot/:id/ask
    let ask = warp::path!("chatbot" / String / "ask")
        .and(warp::post())
        .and(with_fail())
        .and(warp::body::json())
        .map(|chatbot_id: String, _: (), body: AskBody| {
            let conversation_id = body
                .conversation_id
                .unwrap_or_else(|| format!("conv_{}", uuid::Uuid::new_v4().simple()));
            info!(
                "ask[{}] conv={} q={:?}",
                chatbot_id, conversation_id, body.question
            );
            warp::reply::json(&AskReply {
                answer: answer_for(&body.question),
                question: body.question,
                conversation_id,
                processing_time_ms: rand::thread_rng().gen_range(20..180),
            })
        });

    // POST /chatbot/:id/feedback
    let feedback = warp::path!("chatbot" / String / "feedback")
        .and(warp::post())
        .and(with_fail())
        .and(warp::body::json())
        .map(|chatbot_id: String, _: (), body: serde_json::Value| {
            info!("feedback[{}]: {}", chatbot_id, body);
            warp::reply::with_status(
                warp::reply::json(&json!({"message": "Feedback submitted successfully"})),
                StatusCode::CREATED,
            )
        });

    // POST /analytics/sentiment/:id
    let sentiment = warp::path!("analytics" / "sentiment" / String)
        .and(warp::post())
        .and(with_fail())
        .and(warp::body::json())
        .map(|chatbot_id: String, _: (), body: serde_json::Value| {
            info!("sentiment[{}]: {}", chatbot_id, body);
            warp::reply::with_status(
                warp::reply::json(&json!({"message": "Sentiment recorded successfully"})),
                StatusCode::CREATED,
            )
        });

    // POST /ticket/create/:id
    let ticket = warp::path!("ticket" / "create" / String)
        .and(warp::post())
        .and(with_fail())
        .and(warp::body::json())
        .map(|chatbot_id: String, _: (), body: serde_json::Value| {
            let ticket_id = TICKET_COUNTER.fetch_add(1, Ordering::SeqCst);
            info!(
                "ticket[{}] #{} subject={:?}",
                chatbot_id,
                ticket_id,
                body.get("subject")
            );
            warp::reply::with_status(
                warp::reply::json(&json!({
                    "message": "Ticket created successfully",
                    "ticket_id": ticket_id,
                    "created_at": chrono::Utc::now().to_rfc3339(),
                })),
                StatusCode::CREATED,
            )
        });

    // POST /api/leads/submit
    let lead_submit = warp::path!("api" / "leads" / "submit")
        .and(warp::post())
        .and(with_fail())
        .and(warp::body::json())
        .map(|_: (), body: serde_json::Value| {
            info!("lead submitted: {}", body);
            warp::reply::with_status(
                warp::reply::json(&json!({"message": "Lead submitted successfully"})),
                StatusCode::CREATED,
            )
        });

    // POST /api/leads/detect-intent
    let lead_detect = warp::path!("api" / "leads" / "detect-intent")
        .and(warp::post())
        .and(with_fail())
        .and(warp::body::json())
        .map(|_: (), body: DetectIntentBody| {
            // Smooth jitter around a confident score so the widget's
            // threshold logic is worth watching.
            let confidence: f64 = rand::thread_rng().gen_range(0.55..0.95);
            info!(
                "detect-intent conv={} bot={} confidence={:.2}",
                body.conversation_id, body.chatbot_id, confidence
            );
            warp::reply::json(&json!({
                "suggest_lead": true,
                "confidence": confidence,
                "reason": "Sustained conversation engagement",
                "threshold_met": confidence >= 0.3,
            }))
        });

    // GET /static/widget.css - asset only, never interpreted by the widget
    let stylesheet = warp::path!("static" / "widget.css").and(warp::get()).map(|| {
        warp::reply::with_header(
            "/* served by mock-server; the widget embeds its own stylesheet */\n",
            "content-type",
            "text/css",
        )
    });

    let routes = ask
        .or(feedback)
        .or(sentiment)
        .or(ticket)
        .or(lead_submit)
        .or(lead_detect)
        .or(stylesheet)
        .recover(handle_rejection)
        .with(warp::log("mock_server"));

    info!("mock support backend listening on 127.0.0.1:{}", args.port);
    warp::serve(routes).run(([127, 0, 0, 1], args.port)).await;
}

#[derive(Debug)]
struct InjectedFailure;

impl warp::reject::Reject for InjectedFailure {}

async fn handle_rejection(
    err: warp::Rejection,
) -> Result<impl warp::Reply, warp::Rejection> {
    if err.find::<InjectedFailure>().is_some() {
        Ok(warp::reply::with_status(
            warp::reply::json(&json!({"error": "An unexpected error occurred"})),
            StatusCode::INTERNAL_SERVER_ERROR,
        ))
    } else {
        Err(err)
    }
}
