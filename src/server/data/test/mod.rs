mod purchase;
