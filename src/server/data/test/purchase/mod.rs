use crate::server::data::purchase::PurchaseRepository;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod get_by_user;
