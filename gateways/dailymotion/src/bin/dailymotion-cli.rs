use eyre::{Context, bail, eyre};
use oauth2::basic::BasicTokenResponse;
use oauth2::{AccessToken, TokenResponse};
use std::io::IsTerminal;
use tokio_stream::StreamExt;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use videos_dailymotion::oauth::{self, OAuthCredentials, OAuthFlow};
use videos_dailymotion::{DailymotionGateway, GatewaySettings, embed_url, extract_video_id};
use videos_sdk::{CollectionMethod, CollectionOptions, Gateway, ResourceOwner, Video};

const TOKENS_FILE: &str = "tokens.json";

const USAGE: &str = "\
usage: dailymotion-cli <command> [args]

commands:
  login                          authorize in the browser and store tokens.json
  whoami                         show the account the token belongs to
  sections                       list the explorer sections
  video <id|url>                 show a single video
  list <method> [arg] [token]    list one page of a collection
  all <method> [arg]             list every video of a collection
  embed <id|url>                 print the embeddable player URL

methods: uploads, likes, history, playlist <id>, search <query>

environment:
  DAILYMOTION_CLIENT_ID, DAILYMOTION_CLIENT_SECRET   application credentials (login, whoami)
  DAILYMOTION_ACCESS_TOKEN                           overrides the token in tokens.json
  DAILYMOTION_VIDEOS_PER_PAGE                        page size (default 30)";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{USAGE}");
        return Ok(());
    };
    let rest = &args[1..];

    match command.as_str() {
        "login" => login().await,
        "whoami" => whoami().await,
        "sections" => {
            let gateway = gateway().await?;
            for section in gateway.explorer_sections().await? {
                println!("{}", section.name);
                for collection in section.collections {
                    let options = collection
                        .options
                        .iter()
                        .map(|(k, v)| format!(" {k}={v}"))
                        .collect::<String>();
                    println!("  {:<24} {}{options}", collection.name, collection.method);
                }
            }
            Ok(())
        }
        "video" => {
            let target = rest.first().ok_or_else(|| eyre!("video: missing id or url"))?;
            let gateway = gateway().await?;
            let video = if target.contains("://") {
                gateway
                    .video_by_url(target)
                    .await?
                    .ok_or_else(|| eyre!("{target} is not a Dailymotion video URL"))?
            } else {
                gateway.video_by_id(target).await?
            };
            println!("{}", serde_json::to_string_pretty(&video)?);
            Ok(())
        }
        "list" => {
            let (method, options, rest) = collection_args(rest)?;
            let gateway = gateway().await?;
            let page = gateway
                .list_videos(method, &options, rest.first().map(String::as_str))
                .await?;
            for video in &page.videos {
                print_video(video);
            }
            match page.more_token {
                Some(token) if page.more => eprintln!("next page token: {token}"),
                _ => eprintln!("no more pages"),
            }
            Ok(())
        }
        "all" => {
            let (method, options, _) = collection_args(rest)?;
            let gateway = gateway().await?;
            let videos = videos_sdk::paging::all_videos(&gateway, method, &options);
            let mut videos = std::pin::pin!(videos);
            let mut n = 0;
            while let Some(video) = videos.next().await {
                print_video(&video.context("fetch next video")?);
                n += 1;
            }
            eprintln!("{n} videos");
            Ok(())
        }
        "embed" => {
            let target = rest.first().ok_or_else(|| eyre!("embed: missing id or url"))?;
            let id = if target.contains("://") {
                extract_video_id(target)
                    .ok_or_else(|| eyre!("{target} is not a Dailymotion video URL"))?
            } else {
                target.clone()
            };
            println!("{}", embed_url(&id));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            println!("{USAGE}");
            Ok(())
        }
        other => bail!("unknown command {other:?}\n\n{USAGE}"),
    }
}

fn print_video(video: &Video) {
    println!(
        "{}  {:>6}s  {:>8} plays  {}{}",
        video.id(),
        video.duration_seconds(),
        video.plays(),
        video.title(),
        if video.is_private() { "  (private)" } else { "" }
    );
}

/// Splits `<method> [arg] ...` into a method and the options it needs.
fn collection_args(
    args: &[String],
) -> eyre::Result<(CollectionMethod, CollectionOptions, &[String])> {
    let method: CollectionMethod = args
        .first()
        .ok_or_else(|| eyre!("missing collection method"))?
        .parse()?;
    let mut options = CollectionOptions::new();
    let rest = match method {
        CollectionMethod::Playlist | CollectionMethod::Search => {
            let key = if method == CollectionMethod::Playlist {
                "id"
            } else {
                "q"
            };
            let value = args
                .get(1)
                .ok_or_else(|| eyre!("{method} needs an argument"))?;
            options.insert(key.to_string(), value.clone());
            &args[2..]
        }
        _ => &args[1..],
    };
    Ok((method, options, rest))
}

fn credentials() -> eyre::Result<OAuthCredentials> {
    let var = |name: &str| std::env::var(name).with_context(|| format!("read ${name}"));
    Ok(OAuthCredentials {
        client_id: var("DAILYMOTION_CLIENT_ID")?,
        client_secret: var("DAILYMOTION_CLIENT_SECRET")?,
    })
}

async fn access_token() -> eyre::Result<AccessToken> {
    if let Ok(token) = std::env::var("DAILYMOTION_ACCESS_TOKEN") {
        return Ok(AccessToken::new(token));
    }
    if !tokio::fs::try_exists(TOKENS_FILE)
        .await
        .context("check for stored tokens")?
    {
        bail!("no access token; run `dailymotion-cli login` or set $DAILYMOTION_ACCESS_TOKEN");
    }
    let json = tokio::fs::read_to_string(TOKENS_FILE)
        .await
        .context("read stored tokens")?;
    let tokens: BasicTokenResponse =
        serde_json::from_str(&json).context("parse stored tokens")?;
    Ok(tokens.access_token().clone())
}

fn settings() -> eyre::Result<GatewaySettings> {
    let mut settings = GatewaySettings::default();
    if let Ok(n) = std::env::var("DAILYMOTION_VIDEOS_PER_PAGE") {
        settings.videos_per_page = n
            .parse()
            .with_context(|| format!("parse $DAILYMOTION_VIDEOS_PER_PAGE ({n:?})"))?;
    }
    Ok(settings)
}

async fn gateway() -> eyre::Result<DailymotionGateway> {
    Ok(DailymotionGateway::new(
        access_token().await?,
        settings()?,
        reqwest::Client::new(),
    ))
}

async fn login() -> eyre::Result<()> {
    let credentials = credentials()?;
    let tokens = oauth::authenticate(&credentials).await?;

    let owner = OAuthFlow::new(&credentials)?
        .fetch_resource_owner(tokens.access_token())
        .await
        .context("fetch authorized user")?;
    eprintln!(
        "==> authorized as {} ({})",
        owner.name().unwrap_or("?"),
        owner.id().unwrap_or("?")
    );

    let json = serde_json::to_string(&tokens).context("serialize tokens")?;
    tokio::fs::write(TOKENS_FILE, &json)
        .await
        .context("store tokens")?;
    Ok(())
}

async fn whoami() -> eyre::Result<()> {
    let token = access_token().await?;
    let owner = OAuthFlow::new(&credentials()?)?
        .fetch_resource_owner(&token)
        .await?;
    println!("{}", serde_json::to_string_pretty(owner.to_map())?);
    Ok(())
}
