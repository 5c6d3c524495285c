//! `daisy_knowledge`: music-industry knowledge from static tables.

use super::AgentDescriptor;
use crate::config::{render, Instructions};
use crate::error::Result;
use crate::lookup::{KeywordMatcher, LookupTable};
use crate::tool::{ToolHandle, ToolParam, ToolRegistry};
use std::sync::Arc;

pub const NAME: &str = "daisy_knowledge";

const DESCRIPTION: &str = "Music industry knowledge management agent";

const INSTRUCTION: &str = "You are DaisyAI Knowledge, a specialized music industry knowledge management agent.

Your expertise includes:
• Music industry business models and revenue streams
• Record label operations and artist development
• Streaming platforms and digital distribution
• Live music and touring industry
• Music licensing and sync opportunities
• Industry trends and market analysis
• Networking and career development

You provide accurate, up-to-date information to help music professionals make informed decisions.
Always cite sources when possible and acknowledge when information might be outdated or uncertain.
Focus on actionable insights and practical advice for music industry professionals.";

pub const STREAMING_INSIGHTS: &str = "Music Streaming Industry Insights:
- Streaming accounts for 84% of recorded music revenue in 2023
- Spotify has 456M+ monthly active users globally
- Average revenue per stream: $0.003-$0.005 for artists
- Major platforms: Spotify, Apple Music, YouTube Music, Amazon Music
- Playlist placement is crucial for discovery and revenue";

const LABEL_KNOWLEDGE: &str = "Record Label & Distribution Knowledge:
- Major labels: Universal Music Group, Sony Music, Warner Music Group
- Independent distribution: DistroKid, CD Baby, TuneCore, AWAL
- Publishing deals vs distribution deals: different revenue splits
- 360 deals: labels take percentage of touring, merchandise, endorsements
- Typical label splits: 50-85% to label, 15-50% to artist";

const TOURING_KNOWLEDGE: &str = "Live Music & Touring Industry:
- Live music represents 35-40% of total music industry revenue
- Venue types: clubs (500-1500), theaters (1500-5000), arenas (5000-20000), stadiums (20000+)
- Revenue streams: ticket sales, merchandise, VIP packages, sponsorships
- Major promoters: Live Nation, AEG, regional promoters
- Artist touring margins typically 20-40% after expenses";

const SYNC_KNOWLEDGE: &str = "Music Licensing & Sync Knowledge:
- Sync licensing: music used in TV, film, ads, games, content
- Performance rights: ASCAP, BMI, SESAC collect performance royalties
- Mechanical rights: for physical/digital reproduction
- Master vs publishing sync: need both for most uses
- Typical sync fees: $1K-$500K+ depending on usage and profile";

pub const KNOWLEDGE_MENU: &str = "Music Industry Knowledge Search Results for: \"{{query}}\"

I can provide information about:
• Streaming platforms and revenue models
• Record labels and distribution
• Live music and touring industry
• Music licensing and sync opportunities
• Artist development and marketing
• Industry trends and analytics

Please specify what aspect of the music industry you'd like to know more about.";

const LABEL_CONTACTS: &str = "Record Label Contacts & Submission Guidelines:

Major Labels (A&R Contacts):
• Universal Music Group: Submit through UMG's online portal
• Sony Music: Regional A&R contacts vary by genre
• Warner Music Group: Artist development program submissions

Independent Labels:
• Sub Pop Records: Focus on indie rock/alternative
• Domino Recording: UK-based, indie/electronic
• Secretly Group: Multiple imprints, indie focus

Submission Tips:
• Research label roster and aesthetic fit
• Professional press kit with bio, photos, music
• Follow submission guidelines exactly
• Build buzz before reaching out";

const VENUE_CONTACTS: &str = "Venue & Promoter Contact Information:

Booking Agents:
• CAA (Creative Artists Agency): Major touring acts
• WME (William Morris Endeavor): Full-service representation
• Paradigm Talent Agency: Mid-level to major acts
• Regional agents: Focus on local/regional markets

Venue Types:
• Local venues: Build relationships with talent buyers
• Festival booking: Submit 6-12 months in advance
• House concerts: Growing market for intimate performances

Booking Tips:
• Start local, build regional following
• Professional EPK (Electronic Press Kit)
• Demonstrate draw with attendance numbers
• Professional communication and punctuality";

const CONTACTS_MENU: &str = "Industry Contacts for \"{{query}}\":

Available categories:
• Record Labels & A&R
• Venues & Promoters
• Music Supervisors
• Publicists & PR
• Managers & Agents
• Distributors
• Music Tech Companies

Please specify which type of industry contacts you need.";

const CURRENT_TRENDS: &str = "Current Music Industry Trends (2024):

Consumption Patterns:
• TikTok drives 67% of music discovery for Gen Z
• Vinyl sales continue growing (16th consecutive year)
• AI-generated music gaining mainstream attention
• Short-form content optimizing song structures

Technology Impact:
• Spatial audio adoption increasing
• Live streaming concerts normalized post-pandemic
• NFTs and Web3 music experiments ongoing
• AI tools for production becoming mainstream

Market Dynamics:
• Latin music fastest-growing genre globally
• Afrobeats expanding internationally
• Hyperpop and genre-blending trending
• Artist direct-to-fan platforms growing

Industry Shifts:
• Major labels investing in gaming/metaverse
• Sustainability focus in touring and production
• Increased focus on mental health support
• Catalog acquisition valuations stabilizing";

const TRENDS_MENU: &str = "Music Industry Trend Analysis for {{timeframe}}:

Available timeframes:
• Current/2024: Latest trends and developments
• Quarterly: Last 3 months analysis
• Yearly: Annual industry reports
• Historical: Long-term industry evolution

Please specify which timeframe you'd like to analyze.";

fn knowledge_matcher() -> KeywordMatcher {
    KeywordMatcher::new(KNOWLEDGE_MENU)
        .group(&["streaming", "spotify", "revenue"], STREAMING_INSIGHTS)
        .group(&["record label", "distribution", "publishing"], LABEL_KNOWLEDGE)
        .group(&["touring", "live music", "venues", "concerts"], TOURING_KNOWLEDGE)
        .group(&["sync", "licensing", "tv", "film", "advertising"], SYNC_KNOWLEDGE)
}

fn contacts_matcher() -> KeywordMatcher {
    KeywordMatcher::new(CONTACTS_MENU)
        .group(&["label"], LABEL_CONTACTS)
        .group(&["venue", "promoter", "booking"], VENUE_CONTACTS)
}

fn trends_table() -> Result<LookupTable> {
    LookupTable::builder()
        .aliases(&["current", "2024", "recent"], CURRENT_TRENDS)
        .build()
}

/// Build the tool list.
pub fn tools() -> Result<ToolRegistry> {
    let knowledge = Arc::new(knowledge_matcher());
    let contacts = Arc::new(contacts_matcher());
    let trends = Arc::new(trends_table()?);

    ToolRegistry::new()
        .with(
            ToolHandle::from_fn(
                "search_music_industry_knowledge",
                "Searches the music industry knowledge base for information about artists, \
                 labels, trends, and industry practices.",
                move |args| knowledge.respond(args.str("query")),
            )
            .param(ToolParam::required(
                "query",
                "A string containing the search query for music industry information.",
            )),
        )?
        .with(
            ToolHandle::from_fn(
                "get_industry_contacts",
                "Retrieves contact information and networking opportunities in the music industry.",
                move |args| contacts.respond(args.str("category")),
            )
            .param(ToolParam::required(
                "category",
                "The type of industry contacts needed (labels, venues, promoters, etc.).",
            )),
        )?
        .with(
            ToolHandle::from_fn(
                "analyze_music_trends",
                "Analyzes current music industry trends and market data.",
                move |args| {
                    let timeframe = args.str("timeframe");
                    match trends.get(timeframe) {
                        Some(text) => text.to_string(),
                        None => render(TRENDS_MENU, [("timeframe", timeframe)]),
                    }
                },
            )
            .param(ToolParam::optional(
                "timeframe",
                "The time period for trend analysis (current, quarterly, yearly).",
                "current",
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
