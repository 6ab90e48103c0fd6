use crate::{data::member_birthday::MemberBirthdayRepository, model::MonthDay};
use sea_orm::{ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};
use test_utils::{builder::TestBuilder, factory};

mod clear_birthday;
mod get;
mod get_all_by_guild;
mod set_birthday;
mod set_role_assigned;
