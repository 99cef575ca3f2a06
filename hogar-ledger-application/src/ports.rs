use hogar_ledger_domain::MemberId;
use std::{collections::HashMap, hash::BuildHasher};

/// Display names provided by the profile service.
pub trait MemberDirectory: Send + Sync {
    fn display_name(&self, member_id: &MemberId) -> Option<&str>;
}

impl<S> MemberDirectory for HashMap<MemberId, String, S>
where
    S: BuildHasher + Send + Sync,
{
    fn display_name(&self, member_id: &MemberId) -> Option<&str> {
        self.get(member_id).map(String::as_str)
    }
}

pub struct EmptyMemberDirectory;

impl MemberDirectory for EmptyMemberDirectory {
    fn display_name(&self, _member_id: &MemberId) -> Option<&str> {
        None
    }
}
