pub mod member;

pub use member::{
    Link, LinkInput, LinkType, Member, MemberRank, MemberStatus, NewMember, ProfileChanges, Skill,
    SkillInput,
};
