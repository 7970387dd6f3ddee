//! Line model of a hosts file and the pure edit plans the reconciler applies.
//!
//! Lines keep their original terminators so untouched lines are written back
//! byte for byte.

use std::net::Ipv4Addr;

use crate::domain::value_objects::DomainName;

/// One `<ip> <host>` binding found on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding<'a> {
    pub ip: &'a str,
    pub host: &'a str,
}

/// Parse a single line. Comments, blanks and lines with fewer than two
/// fields carry no binding.
pub fn parse_binding(line: &str) -> Option<Binding<'_>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let mut fields = trimmed.split_whitespace();
    let ip = fields.next()?;
    let host = fields.next()?;
    Some(Binding { ip, host })
}

/// Text appended by a block operation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockPlan {
    pub append: String,
    pub added: Vec<DomainName>,
}

impl BlockPlan {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
    }
}

/// Rewritten content after an unblock operation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnblockPlan {
    pub content: String,
    pub removed: usize,
}

#[derive(Debug, Clone)]
pub struct HostsDocument<'a> {
    content: &'a str,
}

impl<'a> HostsDocument<'a> {
    pub fn new(content: &'a str) -> Self {
        Self { content }
    }

    /// Lines including their terminators
    pub fn lines(&self) -> impl Iterator<Item = &'a str> {
        self.content.split_inclusive('\n')
    }

    pub fn bindings(&self) -> impl Iterator<Item = Binding<'a>> {
        self.lines().filter_map(parse_binding)
    }

    /// Hosts bound to `ip`, in file order, without duplicates
    pub fn hosts_bound_to(&self, ip: Ipv4Addr) -> Vec<String> {
        let ip = ip.to_string();
        let mut out: Vec<String> = Vec::new();
        for binding in self.bindings().filter(|b| b.ip == ip) {
            if !out.iter().any(|h| h == binding.host) {
                out.push(binding.host.to_string());
            }
        }
        out
    }

    pub fn is_bound(&self, ip: Ipv4Addr, domain: &DomainName) -> bool {
        let ip = ip.to_string();
        self.bindings()
            .any(|b| b.ip == ip && b.host.eq_ignore_ascii_case(domain.as_str()))
    }

    /// Lines to append so that every domain is bound to `ip`
    pub fn plan_block(&self, ip: Ipv4Addr, domains: &[DomainName]) -> BlockPlan {
        let mut plan = BlockPlan::default();
        for domain in domains {
            if self.is_bound(ip, domain) || plan.added.contains(domain) {
                continue;
            }
            plan.append.push_str(&format!("{} {}\n", ip, domain));
            plan.added.push(domain.clone());
        }

        // keep the current last line intact
        if !plan.is_empty() && !self.content.is_empty() && !self.content.ends_with('\n') {
            plan.append.insert(0, '\n');
        }
        plan
    }

    /// Drop every line whose text contains any of the domains.
    ///
    /// Matching is a plain substring test on the whole line, so `ads` also
    /// removes `myads.example.com` and comments mentioning it. Case is
    /// ignored, the same as for `is_bound`.
    pub fn plan_unblock(&self, domains: &[DomainName]) -> UnblockPlan {
        let mut plan = UnblockPlan::default();
        for line in self.lines() {
            let lowered = line.to_lowercase();
            if domains.iter().any(|d| lowered.contains(d.as_str())) {
                plan.removed += 1;
            } else {
                plan.content.push_str(line);
            }
        }
        plan
    }
}
