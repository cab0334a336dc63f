use lazy_regex::regex_captures;
use rand::rngs::StdRng;
use rand::SeedableRng;
use spotbot_core::puzzle::{InboundMessage, PuzzleWatch};
use spotbot_transport_telegram::bot::views::user_mention_html;
use teloxide::types::User;

fn user(json: &str) -> Result<User, serde_json::Error> {
    serde_json::from_str(json)
}

fn scold(watch: &PuzzleWatch, channel: &str, text: &str, author: &User, seed: u64) -> Option<String> {
    let msg = InboundMessage {
        channel: Some(channel),
        text,
        from_self: false,
    };
    watch.scold(&msg, &user_mention_html(author), &mut StdRng::seed_from_u64(seed))
}

#[test]
fn wordle_in_general_is_scolded_with_mention_and_count() -> Result<(), serde_json::Error> {
    let amy = user(r#"{"id":7,"is_bot":false,"first_name":"Amy","username":"amy_w"}"#)?;
    let watch = PuzzleWatch::new("nyt-dailies", 5..=48);

    for seed in 0..50 {
        let reply = scold(&watch, "general", "Wordle 123 4/6", &amy, seed).unwrap_or_default();
        let Some((_, mention, count)) = regex_captures!(
            r"^Hello (\S+), this is not the proper channel for NYT Puzzle results\. You have been assigned (\d+) arbitrary demerits$",
            &reply
        ) else {
            panic!("unexpected reply: {reply}");
        };
        assert_eq!(mention, "@amy_w");
        let count: u32 = count.parse().unwrap_or(0);
        assert!((5..=48).contains(&count), "count {count} out of range");
    }
    Ok(())
}

#[test]
fn designated_channel_gets_no_reply() -> Result<(), serde_json::Error> {
    let amy = user(r#"{"id":7,"is_bot":false,"first_name":"Amy","username":"amy_w"}"#)?;
    let watch = PuzzleWatch::new("nyt-dailies", 5..=48);
    assert_eq!(scold(&watch, "nyt-dailies", "Wordle 123 4/6", &amy, 1), None);
    Ok(())
}

#[test]
fn mention_without_username_links_and_escapes() -> Result<(), serde_json::Error> {
    let bo = user(r#"{"id":42,"is_bot":false,"first_name":"Bo <3"}"#)?;
    let watch = PuzzleWatch::new("nyt-dailies", 5..=48);

    let reply = scold(&watch, "general", "Strands #301", &bo, 3).unwrap_or_default();
    assert!(reply.starts_with(r#"Hello <a href="tg://user?id=42">Bo &lt;3</a>, "#));
    Ok(())
}
