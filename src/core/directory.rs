use crate::domain::model::{Member, MemberId, NewMember};
use crate::utils::error::{LibraryError, Result};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Default, Clone)]
pub struct Directory {
    members: HashMap<MemberId, Member>,
    order: VecDeque<MemberId>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&mut self, member: NewMember) -> Result<&Member> {
        let id = member.id;
        if self.members.contains_key(&id) {
            tracing::warn!("Refusing duplicate member id {}", id);
            return Err(LibraryError::DuplicateMemberId { id });
        }
        self.order.push_front(id);
        tracing::debug!("Registered member {}", id);
        Ok(&*self.members.entry(id).or_insert_with(|| Member::from(member)))
    }

    pub fn find(&self, id: MemberId) -> Result<&Member> {
        self.members.get(&id).ok_or(LibraryError::MemberNotFound { id })
    }

    pub(crate) fn find_mut(&mut self, id: MemberId) -> Result<&mut Member> {
        self.members
            .get_mut(&id)
            .ok_or(LibraryError::MemberNotFound { id })
    }

    /// Newest registration first, matching the catalog listing.
    pub fn list(&self) -> impl Iterator<Item = &Member> + '_ {
        self.order.iter().filter_map(move |id| self.members.get(id))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_find_member() {
        let mut directory = Directory::new();
        directory.add_member(NewMember::new(1, "Ada")).unwrap();
        directory.add_member(NewMember::new(2, "Grace")).unwrap();

        let grace = directory.find(MemberId(2)).unwrap();
        assert_eq!(grace.name, "Grace");
        assert!(grace.holdings.is_empty());

        let names: Vec<&str> = directory.list().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Grace", "Ada"]);
    }

    #[test]
    fn test_unknown_member() {
        let directory = Directory::new();
        let err = directory.find(MemberId(5)).unwrap_err();
        assert!(matches!(err, LibraryError::MemberNotFound { id } if id == MemberId(5)));
    }

    #[test]
    fn test_duplicate_member_rejected() {
        let mut directory = Directory::new();
        directory.add_member(NewMember::new(1, "Ada")).unwrap();
        assert!(directory.add_member(NewMember::new(1, "Impostor")).is_err());
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.find(MemberId(1)).unwrap().name, "Ada");
    }
}
