//! `daisy_talent`: A&R scouting from static tables.

use super::AgentDescriptor;
use crate::config::{render, Instructions};
use crate::error::Result;
use crate::lookup::LookupTable;
use crate::tool::{ToolHandle, ToolParam, ToolRegistry};
use std::sync::Arc;

pub const NAME: &str = "daisy_talent";

const DESCRIPTION: &str = "A&R agent for artist discovery, analysis, and development";

const INSTRUCTION: &str = "You are Daisy Talent, an expert A&R (Artists & Repertoire) agent specializing in artist discovery,
analysis, and development. Your expertise includes:

- Discovering and evaluating emerging musical talent
- Analyzing artist commercial and creative potential
- Tracking music industry trends and market opportunities
- Scouting appropriate venues and career development paths
- Providing strategic recommendations for artist signings and development

You work collaboratively with other DaisyAI agents to provide comprehensive music industry insights.
Always provide data-driven analysis while maintaining sensitivity to artistic integrity and creative vision.";

const NO_ARTISTS: &str = "No emerging artists found for this genre";

pub const ARTIST_REPORT: &str = "Artist Analysis Report for {{artist_name}}:

COMMERCIAL POTENTIAL: High
- Strong social media engagement (45K followers, 8% engagement rate)
- Streaming momentum: 500K monthly listeners, growing 25% month-over-month
- Viral potential: Recent single gained 2M TikTok views organically

ARTISTIC STRENGTHS:
- Unique vocal style with cross-genre appeal
- Strong songwriting capabilities
- Distinctive visual aesthetic

MARKET OPPORTUNITIES:
- Ideal for sync licensing (TV/film/advertising)
- Strong touring potential in college markets
- Collaboration opportunities with established artists

INVESTMENT RECOMMENDATION: High priority for A&R consideration
SUGGESTED DEAL STRUCTURE: Development deal with option for full album contract";

const TRENDS_MENU: &str = "Please specify 'current', 'emerging', or 'predicted' for timeframe";

const VENUES_MENU: &str =
    "Please specify 'emerging', 'developing', or 'established' for artist level";

fn artists_table() -> Result<LookupTable> {
    let roster = |artists: &[&str]| artists.join(", ");
    LookupTable::builder()
        .entry(
            "pop",
            roster(&[
                "Luna Santos (emerging pop artist from Mexico)",
                "Echo Wave (indie-pop duo from Australia)",
                "Stellar Rose (pop singer-songwriter from UK)",
            ]),
        )
        .entry(
            "hip-hop",
            roster(&[
                "Flow Master J (underground rapper from Atlanta)",
                "Rhythm Queen (female MC from Toronto)",
                "Beat Prophet (producer/rapper from London)",
            ]),
        )
        .entry(
            "indie",
            roster(&[
                "Moonlight Collective (indie rock band from Portland)",
                "Paper Hearts (indie folk artist from Sweden)",
                "Neon Dreams (indie electronic from Berlin)",
            ]),
        )
        .entry(
            "electronic",
            roster(&[
                "Circuit Breaker (techno producer from Detroit)",
                "Digital Waves (ambient artist from Japan)",
                "Pulse Generator (house DJ from Ibiza)",
            ]),
        )
        .build()
}

fn trends_table() -> Result<LookupTable> {
    LookupTable::builder()
        .entry(
            "current",
            "Current Industry Trends (Q4 2024):
- Genre Fusion: Pop-punk revival mixed with hyperpop elements
- Platform Focus: TikTok remains dominant for discovery, YouTube Shorts growing
- Geographic Hotspots: Latin America, Southeast Asia showing strong growth
- Technology: AI-assisted production tools becoming mainstream
- Demographics: Gen Z driving playlist culture, aging millennials maintaining streaming habits",
        )
        .entry(
            "emerging",
            "Emerging Trends (Next 6 months):
- Micro-genres gaining traction: Bedroom pop-punk, Gospel trap, Afro-indie
- Virtual concerts evolving beyond pandemic response
- NFT/Web3 integration in fan engagement
- Sustainability becoming brand differentiator
- Regional language content expanding globally",
        )
        .entry(
            "predicted",
            "Predicted Trends (2025):
- AI music creation tools reshape production workflows
- Spatial audio becomes standard for premium releases
- Cross-platform creator economy integration
- Mental health awareness in artist development
- Climate-conscious touring practices become industry standard",
        )
        .build()
}

/// Venue advice per career stage; `{{region}}` is filled per call.
fn venues_table() -> Result<LookupTable> {
    LookupTable::builder()
        .entry(
            "emerging",
            "Emerging Artist Venues ({{region}}):
- Coffee shops and acoustic venues (50-100 capacity)
- Local music festivals and showcases
- College campuses and university events
- Open mic nights at established venues
- House concerts and intimate listening rooms
BOOKING STRATEGY: Focus on building local fanbase, document performances",
        )
        .entry(
            "developing",
            "Developing Artist Venues ({{region}}):
- Club venues (200-500 capacity)
- Regional festivals and multi-artist showcases
- Opening slots for established touring acts
- Music conference showcases (SXSW, CMJ, etc.)
- Streaming venue partnerships
BOOKING STRATEGY: Expand market radius, focus on ticket sales data",
        )
        .entry(
            "established",
            "Established Artist Venues ({{region}}):
- Theater venues (1,000-3,000 capacity)
- Major music festivals (headliner/sub-headliner slots)
- Arena tours (support slots)
- International venue partnerships
- Signature venue residencies
BOOKING STRATEGY: Data-driven routing, premium fan experiences",
        )
        .build()
}

/// Fill the artist report header.
pub fn artist_report(artist_name: &str) -> String {
    render(ARTIST_REPORT, [("artist_name", artist_name)])
}

/// Build the tool list.
pub fn tools() -> Result<ToolRegistry> {
    let artists = Arc::new(artists_table()?);
    let trends = Arc::new(trends_table()?);
    let venues = Arc::new(venues_table()?);

    ToolRegistry::new()
        .with(
            ToolHandle::from_fn(
                "discover_emerging_artists",
                "Discovers emerging artists based on genre and region filters.",
                move |args| {
                    let genre = args.str("genre");
                    let found = artists.get(genre).unwrap_or(NO_ARTISTS);
                    format!("Emerging {} artists in {}: {}", genre, args.str("region"), found)
                },
            )
            .param(ToolParam::required(
                "genre",
                "The music genre to search for (e.g., \"pop\", \"hip-hop\", \"indie\", \"electronic\")",
            ))
            .param(ToolParam::optional(
                "region",
                "The geographic region to focus on",
                "global",
            )),
        )?
        .with(
            ToolHandle::from_fn(
                "analyze_artist_potential",
                "Analyzes an artist's commercial and creative potential.",
                |args| artist_report(args.str("artist_name")),
            )
            .param(ToolParam::required("artist_name", "The name of the artist to analyze")),
        )?
        .with(
            ToolHandle::from_fn(
                "track_industry_trends",
                "Tracks current music industry trends and opportunities.",
                move |args| trends.get(args.str("timeframe")).unwrap_or(TRENDS_MENU).to_string(),
            )
            .param(ToolParam::optional(
                "timeframe",
                "The time period to analyze (\"current\", \"emerging\", \"predicted\")",
                "current",
            )),
        )?
        .with(
            ToolHandle::from_fn(
                "scout_venue_opportunities",
                "Scouts appropriate venue opportunities for artists at different career stages.",
                move |args| match venues.get(args.str("artist_level")) {
                    Some(template) => render(template, [("region", args.str("region"))]),
                    None => VENUES_MENU.to_string(),
                },
            )
            .param(ToolParam::required(
                "artist_level",
                "The career stage (\"emerging\", \"developing\", \"established\")",
            ))
            .param(ToolParam::optional(
                "region",
                "Geographic region for venue scouting",
                "North America",
            )),
        )
}

/// Build the agent descriptor.
pub fn descriptor(model: &str, instructions: &Instructions) -> Result<AgentDescriptor> {
    Ok(AgentDescriptor::new(
        NAME,
        model,
        DESCRIPTION,
        instructions.resolve(NAME, INSTRUCTION),
        tools()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(tool: &str, args: serde_json::Value) -> String {
        let registry = tools().unwrap();
        tokio_test::block_on(registry.invoke(tool, Some(&args))).unwrap()
    }

    #[test]
    fn test_artist_report_header() {
        let out = call("analyze_artist_potential", json!({"artist_name": "Test Artist"}));
        assert!(out.starts_with("Artist Analysis Report for Test Artist:\n\nCOMMERCIAL POTENTIAL: High"));
        assert_eq!(out, artist_report("Test Artist"));
    }

    #[test]
    fn test_artist_report_independent_of_call_order() {
        let a1 = call("analyze_artist_potential", json!({"artist_name": "A"}));
        let _ = call("analyze_artist_potential", json!({"artist_name": "B"}));
        let a2 = call("analyze_artist_potential", json!({"artist_name": "A"}));
        assert_eq!(a1, a2);
        assert_eq!(
            a1.replacen("for A:", "for B:", 1),
            call("analyze_artist_potential", json!({"artist_name": "B"}))
        );
    }

    #[test]
    fn test_discover_known_genre() {
        let out = call("discover_emerging_artists", json!({"genre": "Hip-Hop", "region": "Canada"}));
        assert_eq!(
            out,
            "Emerging Hip-Hop artists in Canada: Flow Master J (underground rapper from Atlanta), \
             Rhythm Queen (female MC from Toronto), Beat Prophet (producer/rapper from London)"
        );
    }

    #[test]
    fn test_discover_unknown_genre_uses_default_region() {
        let out = call("discover_emerging_artists", json!({"genre": "polka"}));
        assert_eq!(
            out,
            "Emerging polka artists in global: No emerging artists found for this genre"
        );
    }

    #[test]
    fn test_trends() {
        assert!(call("track_industry_trends", json!({})).starts_with("Current Industry Trends (Q4 2024):"));
        assert!(call("track_industry_trends", json!({"timeframe": "Predicted"}))
            .starts_with("Predicted Trends (2025):"));
        assert_eq!(call("track_industry_trends", json!({"timeframe": "yearly"})), TRENDS_MENU);
    }

    #[test]
    fn test_venues_fill_region() {
        let out = call("scout_venue_opportunities", json!({"artist_level": "developing"}));
        assert!(out.starts_with("Developing Artist Venues (North America):"));

        let out = call(
            "scout_venue_opportunities",
            json!({"artist_level": "established", "region": "Europe"}),
        );
        assert!(out.starts_with("Established Artist Venues (Europe):"));
        assert!(!out.contains("{{region}}"));

        assert_eq!(
            call("scout_venue_opportunities", json!({"artist_level": "superstar"})),
            VENUES_MENU
        );
    }
}
