use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum Order {
    /// Most recently created first
    Newest,
    /// Oldest first, ie. posting order
    Oldest,
    /// Most voted first
    Top,
}

impl Order {
    pub const ALL: [Order; 3] = [Order::Newest, Order::Oldest, Order::Top];

    pub fn name(&self) -> &'static str {
        match self {
            Order::Newest => "newest",
            Order::Oldest => "oldest",
            Order::Top => "top",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Order {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Order> {
        Order::ALL
            .into_iter()
            .find(|o| o.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                anyhow::anyhow!("unknown sort order {s:?}, expected newest, oldest or top")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names() {
        for o in Order::ALL {
            assert_eq!(o.to_string().parse::<Order>().unwrap(), o);
        }
        assert_eq!(" TOP ".parse::<Order>().unwrap(), Order::Top);
        assert!("best".parse::<Order>().is_err());
    }
}
