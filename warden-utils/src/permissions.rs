use poise::serenity_prelude as serenity;

/// Resolve a member's effective guild-level permissions.
///
/// The guild owner always resolves to every permission. Channel overwrites
/// are not applied; moderation commands gate on guild-level grants.
pub async fn resolve_user_permissions(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> anyhow::Result<serenity::Permissions> {
    let guild = guild_id.to_partial_guild(http).await?;
    if guild.owner_id == user_id {
        return Ok(serenity::Permissions::all());
    }

    let member = guild_id.member(http, user_id).await?;
    let roles = guild_id.roles(http).await?;

    let everyone_role_id = serenity::RoleId::new(guild_id.get());
    let resolved = roles
        .values()
        .filter(|role| role.id == everyone_role_id || member.roles.contains(&role.id))
        .fold(serenity::Permissions::empty(), |acc, role| acc | role.permissions);

    Ok(resolved)
}

/// Check whether `user_id` holds `required` (or `ADMINISTRATOR`) in the guild.
pub async fn has_user_permission(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    required: serenity::Permissions,
) -> anyhow::Result<bool> {
    let perms = resolve_user_permissions(http, guild_id, user_id).await?;
    Ok(grants(perms, required))
}

/// Pure grant check used by [`has_user_permission`].
pub fn grants(held: serenity::Permissions, required: serenity::Permissions) -> bool {
    held.contains(serenity::Permissions::ADMINISTRATOR) || held.contains(required)
}

#[cfg(test)]
mod tests {
    use super::grants;
    use poise::serenity_prelude as serenity;

    #[test]
    fn administrator_grants_everything() {
        assert!(grants(
            serenity::Permissions::ADMINISTRATOR,
            serenity::Permissions::KICK_MEMBERS | serenity::Permissions::MANAGE_CHANNELS,
        ));
    }

    #[test]
    fn requires_every_bit() {
        let held = serenity::Permissions::MANAGE_MESSAGES;
        assert!(grants(held, serenity::Permissions::MANAGE_MESSAGES));
        assert!(!grants(held, serenity::Permissions::MANAGE_CHANNELS));
        assert!(!grants(
            held,
            serenity::Permissions::MANAGE_MESSAGES | serenity::Permissions::KICK_MEMBERS
        ));
    }
}
