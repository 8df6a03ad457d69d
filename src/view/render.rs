// SPDX-License-Identifier: GPL-3.0-or-later

use crate::api::common::{Listing, LoadState};
use std::fmt::{Display, Formatter};

pub const NO_ITEMS: &str = "No items in marketplace";

/// What the marketplace view shows.
#[derive(Debug, PartialEq, Eq)]
pub enum Page<'a> {
    /// Listings were loaded and there are none.
    Empty,
    Grid(Vec<Card<'a>>),
}

impl<'a> Page<'a> {
    pub fn new(load_state: LoadState, listings: &'a [Listing]) -> Self {
        if load_state == LoadState::Loaded && listings.is_empty() {
            return Page::Empty;
        }
        Page::Grid(listings.iter().map(Card::new).collect())
    }
}

/// A single listing in the grid, with its buy action.
#[derive(Debug, PartialEq, Eq)]
pub struct Card<'a> {
    listing: &'a Listing,
}

impl<'a> Card<'a> {
    fn new(listing: &'a Listing) -> Self {
        Card { listing }
    }

    pub fn image(&self) -> &str {
        &self.listing.image
    }

    pub fn name(&self) -> &str {
        &self.listing.name
    }

    pub fn description(&self) -> &str {
        &self.listing.description
    }

    pub fn price_label(&self) -> String {
        format!("Price: {} ETH", self.listing.price)
    }

    /// The listing bought when the card's buy action is triggered.
    pub fn buy_target(&self) -> &'a Listing {
        self.listing
    }
}

impl Display for Card<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "#{} {}", self.listing.token_id, self.name())?;
        writeln!(f, "{}", self.description())?;
        writeln!(f, "{}", self.image())?;
        writeln!(f, "{}", self.price_label())?;
        write!(f, "[Buy]")
    }
}

impl Display for Page<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Page::Empty => f.write_str(NO_ITEMS),
            Page::Grid(cards) => {
                for (i, card) in cards.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n\n")?;
                    }
                    write!(f, "{card}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn loaded_without_listings_is_empty() {
        assert_eq!(Page::new(LoadState::Loaded, &[]), Page::Empty);
        assert_eq!(Page::Empty.to_string(), "No items in marketplace");
        assert_eq!(Page::new(LoadState::NotLoaded, &[]), Page::Grid(Vec::new()));
    }

    #[test]
    fn grid_shows_every_listing() -> Result<()> {
        let listings = vec![listing(1, "N", "1.0")?, listing(2, "M", "0.5")?];

        let page = Page::new(LoadState::Loaded, &listings);

        let Page::Grid(cards) = &page else {
            panic!("Expected a grid");
        };
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].price_label(), "Price: 0.5 ETH");
        assert_eq!(cards[1].buy_target(), &listings[1]);
        assert_eq!(
            page.to_string(),
            "#1 N\nD\na.png\nPrice: 1.0 ETH\n[Buy]\n\n#2 M\nD\na.png\nPrice: 0.5 ETH\n[Buy]"
        );
        Ok(())
    }

    fn listing(token_id: u64, name: &str, price: &str) -> Result<Listing> {
        Ok(Listing {
            price: price.into(),
            token_id,
            seller: "0x00000000000000000000000000000000000000aa".parse()?,
            owner: "0x000000000000000000000000000000000000beef".parse()?,
            image: "a.png".into(),
            name: name.into(),
            description: "D".into(),
        })
    }
}
