use atat::atat_derive::AtatResp;

/// Commands which gets just responded by OK
///
/// Responses are not parsed by ATAT but classified by [ResponseWindow](crate::classifier::ResponseWindow),
/// so this is the response type of every command.
#[derive(Clone, AtatResp)]
pub struct NoResponse;
