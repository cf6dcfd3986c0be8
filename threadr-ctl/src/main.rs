use std::path::PathBuf;

use anyhow::{anyhow, Context};
use threadr_client::{
    api::{self, BlobStore, Comment, CommentId, Error, Order, Time},
    CommentDb, DbConfig, FileStore, RenderLine, View,
};

/// Past this depth, replies are no longer indented further
const MAX_INDENT_LEVELS: usize = 10;

#[derive(structopt::StructOpt)]
struct Opt {
    /// Directory holding the comment store
    #[structopt(short, long, env = "THREADR_STORE", default_value = ".threadr")]
    store: PathBuf,

    /// Key the comments are stored under [default: comments_tree_v2]
    #[structopt(long, env = "THREADR_KEY")]
    key: Option<String>,

    /// Refuse replies nested deeper than this (roots are at depth 0)
    #[structopt(long, env = "THREADR_MAX_DEPTH")]
    max_depth: Option<usize>,

    /// Print errors as JSON
    #[structopt(long)]
    json: bool,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Post a new top-level comment, printing its id
    Post {
        text: String,

        #[structopt(short, long)]
        author: Option<String>,
    },

    /// Reply to a comment, printing the reply's id
    Reply {
        parent: String,

        text: String,

        #[structopt(short, long)]
        author: Option<String>,
    },

    /// Replace the text of a comment
    Edit { id: String, text: String },

    /// Delete a comment along with all its replies
    Delete { id: String },

    /// Add votes to a comment, printing its new vote count
    Vote {
        id: String,

        #[structopt(allow_hyphen_values = true)]
        delta: i64,
    },

    /// Upvote a comment
    Up { id: String },

    /// Downvote a comment
    Down { id: String },

    /// Flip whether the replies of a comment are shown
    Collapse {
        id: String,

        /// Hide the replies, whatever the current state
        #[structopt(long, conflicts_with = "expand")]
        hide: bool,

        /// Show the replies, whatever the current state
        #[structopt(long)]
        expand: bool,
    },

    /// Reorder all comments: newest, oldest or top
    Sort { order: String },

    /// Show a single comment
    Show { id: String },

    /// Show the comment tree
    View {
        /// Only show comments containing this text, and their parents
        #[structopt(short, long, default_value = "")]
        search: String,
    },

    /// Print the total number of comments
    Count,

    /// Delete every comment
    Clear {
        /// Confirm deleting everything
        #[structopt(long)]
        yes: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let opt = <Opt as structopt::StructOpt>::from_args();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let store = FileStore::open(&opt.store)
        .with_context(|| format!("opening comment store {:?}", opt.store))?;
    let mut config = DbConfig {
        max_depth: opt.max_depth,
        ..DbConfig::default()
    };
    if let Some(key) = opt.key {
        config.storage_key = key;
    }
    let mut db = CommentDb::open(store, config);

    match run(&mut db, opt.cmd, api::now()) {
        Ok(out) => print!("{out}"),
        Err(err) => {
            eprintln!("{}", report(&err, opt.json));
            std::process::exit(1);
        }
    }
    Ok(())
}

fn run<S: BlobStore>(db: &mut CommentDb<S>, cmd: Command, now: Time) -> anyhow::Result<String> {
    Ok(match cmd {
        Command::Post { text, author } => {
            format!("{}\n", db.add_root(&text, author.as_deref())?)
        }
        Command::Reply {
            parent,
            text,
            author,
        } => format!(
            "{}\n",
            db.add_reply(&CommentId(parent), &text, author.as_deref())?
        ),
        Command::Edit { id, text } => {
            db.edit(&CommentId(id), &text)?;
            String::new()
        }
        Command::Delete { id } => {
            let removed = db.delete(&CommentId(id))?;
            let num = 1 + threadr_client::locate::count(&removed.replies);
            format!("deleted {num} comment{}\n", plural(num))
        }
        Command::Vote { id, delta } => format!("{}\n", db.vote(&CommentId(id), delta)?),
        Command::Up { id } => format!("{}\n", db.vote(&CommentId(id), 1)?),
        Command::Down { id } => format!("{}\n", db.vote(&CommentId(id), -1)?),
        Command::Collapse { id, hide, expand } => {
            let explicit = match (hide, expand) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            match db.toggle_collapse(&CommentId(id), explicit)? {
                true => String::from("collapsed\n"),
                false => String::from("expanded\n"),
            }
        }
        Command::Sort { order } => {
            let order = order
                .parse::<Order>()
                .map_err(|err| tracing::warn!(%err, "leaving comments in their current order"))
                .ok();
            match db.set_sort_order(order)? {
                true => format!("sorted by {}\n", db.search().order.map_or("", |o| o.name())),
                false => String::new(),
            }
        }
        Command::Show { id } => {
            let id = CommentId(id);
            let comment = db.get(&id).ok_or(Error::NotFound(id))?;
            show(comment, now)
        }
        Command::View { search } => {
            db.set_search_query(&search);
            render(&db.view(), now)
        }
        Command::Count => format!("{}\n", db.count()),
        Command::Clear { yes } => {
            if !yes {
                return Err(anyhow!(
                    "refusing to delete all {} comments without --yes",
                    db.count()
                ));
            }
            db.clear_all()?;
            String::new()
        }
    })
}

fn report(err: &anyhow::Error, json: bool) -> String {
    match (json, err.downcast_ref::<Error>()) {
        (true, Some(e)) => e.contents().to_string(),
        (true, None) => serde_json::json!({
            "message": format!("{err:#}"),
            "type": "unknown",
        })
        .to_string(),
        (false, _) => format!("error: {err:#}"),
    }
}

fn plural(n: impl TryInto<u8>) -> &'static str {
    match n.try_into() {
        Ok(1) => "",
        _ => "s",
    }
}

fn replies_word(n: usize) -> &'static str {
    match n {
        1 => "reply",
        _ => "replies",
    }
}

fn time_ago(date: Time, now: Time) -> String {
    let secs = (now - date).num_seconds().max(0);
    match secs {
        s if s < 60 => format!("{s}s ago"),
        s if s < 3600 => format!("{}m ago", s / 60),
        s if s < 86400 => format!("{}h ago", s / 3600),
        s => format!("{}d ago", s / 86400),
    }
}

fn header(c: &Comment, now: Time) -> String {
    let edited = match c.edited {
        true => " • edited",
        false => "",
    };
    format!(
        "{} • {}{} • {} vote{} [{}]",
        c.author,
        time_ago(c.created_at, now),
        edited,
        c.votes,
        plural(c.votes),
        c.id
    )
}

fn push_line(out: &mut String, indent: &str, line: &str) {
    out.push_str(indent);
    out.push_str(line);
    out.push('\n');
}

fn render_line(out: &mut String, line: &RenderLine<'_>, now: Time) {
    let indent = "  ".repeat(line.depth.min(MAX_INDENT_LEVELS));
    push_line(out, &indent, &header(line.comment, now));
    for text in line.comment.text.lines() {
        push_line(out, &indent, &format!("  {text}"));
    }
    if line.hides_replies() {
        let hidden = threadr_client::locate::count(&line.comment.replies);
        push_line(
            out,
            &indent,
            &format!("  [{hidden} hidden {}]", replies_word(hidden)),
        );
    }
}

fn render(view: &View<'_>, now: Time) -> String {
    let mut out = String::new();
    for line in view.lines() {
        render_line(&mut out, &line, now);
    }
    match view.is_filtered() {
        true => push_line(
            &mut out,
            "",
            &format!("Comments: {} of {} shown", view.shown(), view.total()),
        ),
        false => push_line(&mut out, "", &format!("Comments: {}", view.total())),
    }
    out
}

fn show(c: &Comment, now: Time) -> String {
    let mut out = String::new();
    push_line(&mut out, "", &header(c, now));
    for text in c.text.lines() {
        push_line(&mut out, "  ", text);
    }
    if let Some(edited_at) = c.edited_at {
        push_line(&mut out, "", &format!("last edited {}", time_ago(edited_at, now)));
    }
    let replies = threadr_client::locate::count(&c.replies);
    push_line(&mut out, "", &format!("{replies} {}", replies_word(replies)));
    out
}
